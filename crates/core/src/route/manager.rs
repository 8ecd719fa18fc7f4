//! Route Manager
//!
//! Holds two route buffers. New routes are built into the standby buffer
//! and only take effect after `swap`, so the active route never changes
//! mid-tick.
//!
//! # Per-tick guidance
//!
//! 1. With a non-empty active route and a GPS fix younger than
//!    `RouteParams::gps_max_age_s`, compute course and distance to the
//!    current waypoint (the home point once the route is exhausted) and
//!    publish the course as the target ground track.
//! 2. Inside `RouteParams::wp_radius_m` the cursor advances one waypoint.
//! 3. Publish one altitude target by fixed precedence: AGL override, MSL
//!    override, waypoint AGL, waypoint MSL.
//! 4. Solve the wind triangle for the heading to fly and the ground speed,
//!    and derive the ETA.
//!
//! With an empty active route the last ground track is held. If none was
//! ever commanded, the current estimated heading is latched.

use super::error::RouteError;
use super::route::Route;
use super::waypoint::{Waypoint, WaypointMode, ALT_UNSET_M};
use crate::navigation::geo::{heading_f32, wind_course, KT_TO_MPS, M_TO_FT};
use crate::parameters::{ConfigError, ConfigSection, RouteParams};
use crate::state::{AltitudeTarget, FlightState};

/// Section declaring a waypoint
pub const WAYPOINT_SECTION: &str = "wpt";

/// Marker section carried by route files, ignored
pub const ENABLE_SECTION: &str = "enable";

/// Anchors closer than this to (0, 0) are treated as "no fix yet"
pub const REPOSITION_EPSILON_DEG: f64 = 0.0001;

/// Ground speed below which no ETA is computed (kt)
const MIN_ETA_GROUNDSPEED_KT: f64 = 0.1;

/// Overrides and waypoint altitudes at or below this are ignored
const MIN_ALTITUDE: f64 = 1.0;

/// Double-buffered route with home fallback
pub struct RouteManager {
    routes: [Route; 2],
    active: usize,
    home: Option<Waypoint>,
    params: RouteParams,
    course_deg: Option<f64>,
    distance_m: f64,
}

impl RouteManager {
    pub fn new(params: RouteParams) -> Self {
        Self {
            routes: [Route::new(), Route::new()],
            active: 0,
            home: None,
            params,
            course_deg: None,
            distance_m: 0.0,
        }
    }

    /// Build the configured route and make it active
    pub fn init(&mut self, sections: &[ConfigSection]) -> Result<(), ConfigError> {
        self.build(sections)?;
        self.swap();
        Ok(())
    }

    /// Parse waypoint sections into the standby route
    ///
    /// `wpt` sections become waypoints and `enable` markers are skipped.
    /// Any other section name is a fatal configuration error; the standby
    /// route is left untouched in that case.
    ///
    /// # Returns
    ///
    /// Number of waypoints loaded
    pub fn build(&mut self, sections: &[ConfigSection]) -> Result<u16, ConfigError> {
        let mut route = Route::new();

        for section in sections {
            match section.name() {
                WAYPOINT_SECTION => {
                    let wp = Waypoint::from_section(section)?;
                    route
                        .add_waypoint(wp)
                        .map_err(|_| ConfigError::CapacityExceeded("route waypoints"))?;
                }
                ENABLE_SECTION => {}
                other => {
                    crate::log_error!("route: unknown config section {}", other);
                    return Err(ConfigError::UnknownSection(section.name_owned()));
                }
            }
        }

        let count = route.len();
        *self.standby_mut() = route;
        crate::log_info!("route: loaded {} waypoints", count);
        Ok(count)
    }

    /// Exchange active and standby routes
    ///
    /// Refused while the standby route is empty.
    pub fn swap(&mut self) -> bool {
        if self.standby().is_empty() {
            crate::log_debug!("route: standby empty, swap refused");
            return false;
        }
        self.active = 1 - self.active;
        crate::log_info!("route: activated {} waypoints", self.active().len());
        true
    }

    /// Run one guidance tick
    pub fn update(&mut self, state: &mut FlightState) {
        let fresh = state.gps_age_s() < self.params.gps_max_age_s as f64;
        let mut tracked: Option<Waypoint> = None;

        if !self.active().is_empty() && fresh {
            let home = self.home;
            let radius = self.params.wp_radius_m as f64;
            let route = &mut self.routes[self.active];

            let target = route.current_waypoint().copied().or(home);
            if let Some(target) = target {
                let (course, distance) =
                    target.course_and_distance(state.nav.lon_deg, state.nav.lat_deg);
                self.course_deg = Some(course);
                self.distance_m = distance;
                tracked = Some(target);

                if distance < radius && route.current_waypoint().is_some() {
                    crate::log_info!("route: reached waypoint {}", route.current_index());
                    route.increment_current();
                }
            }
            state.route.target_waypoint_idx = route.current_index();
        }

        let course = *self
            .course_deg
            .get_or_insert(state.nav.heading_deg as f64);
        state.targets.groundtrack_deg = heading_f32(course);
        state.route.wp_dist_m = self.distance_m as f32;

        if let Some(target) = altitude_target(
            state.command.override_agl_ft as f64,
            state.command.override_msl_ft as f64,
            tracked.as_ref(),
        ) {
            state.targets.altitude = Some(target);
        }

        let wind = state.wind;
        let (heading, groundspeed_kt) = wind_course(
            wind.speed_kt as f64,
            wind.true_airspeed_kt as f64,
            wind.from_deg as f64,
            course,
        )
        .unwrap_or((course, 0.0));
        state.wind.target_heading_deg = heading_f32(heading);
        state.wind.groundspeed_kt = groundspeed_kt as f32;
        state.route.wp_eta_s = eta_seconds(self.distance_m, groundspeed_kt) as f32;
    }

    /// Append a waypoint given as `"<lon>,<lat>[@<alt_ft>]"` to the standby route
    pub fn new_waypoint(&mut self, text: &str) -> Result<(), RouteError> {
        let wp = Waypoint::parse(text)?;
        self.standby_mut().add_waypoint(wp)?;
        crate::log_info!("route: standby waypoint {}, {}", wp.lon_deg, wp.lat_deg);
        Ok(())
    }

    /// Append a waypoint built from numeric fields to the standby route
    ///
    /// Relative: `field1` is the offset heading (degrees), `field2` the offset
    /// distance (m). Absolute: `field1` is longitude, `field2` latitude.
    pub fn new_waypoint_fields(
        &mut self,
        field1: f64,
        field2: f64,
        mode: WaypointMode,
    ) -> Result<(), RouteError> {
        let wp = match mode {
            WaypointMode::Relative => Waypoint::relative(field1, field2),
            WaypointMode::Absolute => Waypoint::absolute(field1, field2, ALT_UNSET_M),
        };
        self.standby_mut().add_waypoint(wp)
    }

    /// Re-anchor the relative waypoints of the active route
    ///
    /// Rejected when the anchor sits at (0, 0), which means no position fix
    /// has been received yet.
    pub fn reposition_pattern(&mut self, anchor: &Waypoint, heading_deg: f64) -> bool {
        if anchor.lon_deg.abs() <= REPOSITION_EPSILON_DEG
            && anchor.lat_deg.abs() <= REPOSITION_EPSILON_DEG
        {
            crate::log_warn!("route: reposition rejected, anchor at origin");
            return false;
        }
        self.routes[self.active].refresh_offset_positions(anchor, heading_deg);
        crate::log_info!(
            "route: pattern anchored at {}, {} heading {}",
            anchor.lon_deg,
            anchor.lat_deg,
            heading_deg
        );
        true
    }

    /// Drop everything in the standby route
    pub fn clear_standby(&mut self) {
        self.standby_mut().clear();
    }

    pub fn set_home(&mut self, home: Waypoint) {
        self.home = Some(home);
        crate::log_info!("route: home set to {}, {}", home.lon_deg, home.lat_deg);
    }

    pub fn home(&self) -> Option<&Waypoint> {
        self.home.as_ref()
    }

    pub fn active(&self) -> &Route {
        &self.routes[self.active]
    }

    pub fn standby(&self) -> &Route {
        &self.routes[1 - self.active]
    }

    fn standby_mut(&mut self) -> &mut Route {
        &mut self.routes[1 - self.active]
    }

    /// Number of waypoints in the active route
    pub fn size(&self) -> u16 {
        self.active().len()
    }

    /// Waypoint of the active route
    pub fn get_waypoint(&self, index: u16) -> Option<&Waypoint> {
        self.active().get_waypoint(index)
    }
}

/// Pick the altitude target by fixed precedence
///
/// Overrides are in feet, waypoint altitudes in meters; the result is in feet.
/// Values at or below 1 do not count as set.
pub fn altitude_target(
    override_agl_ft: f64,
    override_msl_ft: f64,
    waypoint: Option<&Waypoint>,
) -> Option<AltitudeTarget> {
    if override_agl_ft > MIN_ALTITUDE {
        return Some(AltitudeTarget::AglFt(override_agl_ft as f32));
    }
    if override_msl_ft > MIN_ALTITUDE {
        return Some(AltitudeTarget::MslFt(override_msl_ft as f32));
    }
    let wp = waypoint?;
    if wp.agl_m > MIN_ALTITUDE {
        Some(AltitudeTarget::AglFt((wp.agl_m * M_TO_FT) as f32))
    } else if wp.alt_msl_m > MIN_ALTITUDE {
        Some(AltitudeTarget::MslFt((wp.alt_msl_m * M_TO_FT) as f32))
    } else {
        None
    }
}

/// Time to cover `distance_m` at `groundspeed_kt`; 0 when barely moving
pub fn eta_seconds(distance_m: f64, groundspeed_kt: f64) -> f64 {
    if groundspeed_kt > MIN_ETA_GROUNDSPEED_KT {
        distance_m / (groundspeed_kt * KT_TO_MPS)
    } else {
        0.0
    }
}
