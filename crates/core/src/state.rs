//! Shared flight state
//!
//! One `FlightState` is threaded by reference through every component's tick
//! entry point. Each field group has a single writer:
//!
//! | Group      | Written by                         |
//! |------------|------------------------------------|
//! | `time_s`, `imu`, `gps`, `wind` (inputs) | sensor drivers / wind estimator |
//! | `command`  | operator link                      |
//! | `nav`, `filters` | `NavigationManager`          |
//! | `route`, `targets.groundtrack_deg`, `targets.altitude`, `wind` (outputs) | `RouteManager` |
//! | `locks`, `pointing`, `targets` (roll/pitch/speed) | `AutopilotController` |

use heapless::Vec;

use crate::autopilot::{FcsMode, LockAssignment, PointingCommand};
use crate::navigation::{FilterOutput, GpsSample, ImuSample, NavSolution, MAX_FILTERS};

/// Wind estimate and wind-corrected guidance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindState {
    /// Wind speed (kt)
    pub speed_kt: f32,
    /// Direction the wind blows from (degrees)
    pub from_deg: f32,
    /// True airspeed (kt)
    pub true_airspeed_kt: f32,
    /// Heading to fly to hold the target ground track (degrees)
    pub target_heading_deg: f32,
    /// Ground speed expected on the target ground track (kt)
    pub groundspeed_kt: f32,
}

/// Operator inputs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OperatorCommand {
    /// Autopilot master switch
    pub master_switch: bool,
    /// Commanded mode
    pub fcs_mode: FcsMode,
    /// Altitude override above ground (ft); values <= 1 mean none
    pub override_agl_ft: f32,
    /// Altitude override above sea level (ft); values <= 1 mean none
    pub override_msl_ft: f32,
}

/// Altitude target published to the altitude loop
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AltitudeTarget {
    /// Height above ground (ft)
    AglFt(f32),
    /// Altitude above mean sea level (ft)
    MslFt(f32),
}

/// Setpoints for the control cascade
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AutopilotTargets {
    pub roll_deg: f32,
    pub pitch_base_deg: f32,
    pub speed_kt: f32,
    pub groundtrack_deg: f32,
    pub altitude: Option<AltitudeTarget>,
}

/// Route progress
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteStatus {
    /// Cursor of the active route; equals the route length once exhausted
    pub target_waypoint_idx: u16,
    /// Distance to the tracked waypoint (m)
    pub wp_dist_m: f32,
    /// Time to the tracked waypoint at the expected ground speed (s)
    pub wp_eta_s: f32,
}

/// Typed flight state shared by all components
#[derive(Debug, Clone, Default)]
pub struct FlightState {
    /// Time of the current tick (s)
    pub time_s: f64,
    pub imu: ImuSample,
    /// Latest fix, `None` before the first one
    pub gps: Option<GpsSample>,
    pub wind: WindState,
    /// Canonical navigation estimate
    pub nav: NavSolution,
    /// Per-filter estimates in configuration order
    pub filters: Vec<FilterOutput, MAX_FILTERS>,
    pub command: OperatorCommand,
    pub targets: AutopilotTargets,
    pub locks: LockAssignment,
    pub pointing: PointingCommand,
    pub route: RouteStatus,
}

impl FlightState {
    /// Age of the latest GPS fix; infinite when none was received
    pub fn gps_age_s(&self) -> f64 {
        self.gps
            .as_ref()
            .map_or(f64::INFINITY, |fix| fix.age_s(self.time_s))
    }
}
