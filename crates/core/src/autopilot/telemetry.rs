//! Autopilot telemetry
//!
//! Every tick the controller builds one `TelemetryRecord`: the current
//! setpoints plus one waypoint of the active route. Successive records walk
//! the route (index 0, 1, ...) and then send the home point tagged
//! `HOME_INDEX`, so a ground station reconstructs the full route over time.
//! Until a home point is set the walk skips that slot, and with neither a
//! route nor a home there is nothing to send.
//!
//! Two sinks, each behind its own `RateDecimator`:
//! - radio link: the walk only advances after a successful send, and a
//!   failed send is retried on the next tick
//! - flight log: decimated unconditionally

use crate::route::Waypoint;
use crate::state::AutopilotTargets;

/// Index reported for the home point
pub const HOME_INDEX: u16 = 65535;

/// One autopilot status record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    pub timestamp_s: f64,
    pub targets: AutopilotTargets,
    /// Active route length
    pub route_size: u16,
    pub waypoint: Waypoint,
    /// Route index of `waypoint`, or `HOME_INDEX`
    pub index: u16,
}

impl TelemetryRecord {
    pub fn is_home(&self) -> bool {
        self.index == HOME_INDEX
    }
}

/// Radio link send failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Transmit queue full
    Busy,
    /// No link
    Disconnected,
}

impl LinkError {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkError::Busy => "link busy",
            LinkError::Disconnected => "link disconnected",
        }
    }
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ground station radio link
pub trait TelemetryLink {
    fn send_autopilot(&mut self, record: &TelemetryRecord) -> Result<(), LinkError>;
}

/// On-board flight log
pub trait TelemetryLog {
    fn log_autopilot(&mut self, record: &TelemetryRecord);

    /// Free-form event line: `"<header> <message>"`
    fn log_event(&mut self, _header: &str, _message: &str) {}
}

/// Telemetry sinks available this tick; either may be absent
#[derive(Default)]
pub struct TelemetryOutputs<'a> {
    pub link: Option<&'a mut dyn TelemetryLink>,
    pub log: Option<&'a mut dyn TelemetryLog>,
}

impl TelemetryOutputs<'_> {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Emits on one tick, then skips `skip` ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecimator {
    skip: u32,
    countdown: u32,
}

impl RateDecimator {
    /// The first tick is always due
    pub const fn new(skip: u32) -> Self {
        Self { skip, countdown: 0 }
    }

    pub fn is_due(&self) -> bool {
        self.countdown == 0
    }

    /// Restart the skip window after an emission
    pub fn mark_sent(&mut self) {
        self.countdown = self.skip;
    }

    /// Count down one skipped tick
    pub fn skip_tick(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
    }

    /// Unconditional advance: `true` when this tick emits
    pub fn advance(&mut self) -> bool {
        if self.is_due() {
            self.mark_sent();
            true
        } else {
            self.skip_tick();
            false
        }
    }
}
