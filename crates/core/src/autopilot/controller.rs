//! Autopilot Controller
//!
//! Turns the operator's master switch and commanded mode into a lock
//! assignment, runs the control cascade while a mode is engaged, and emits
//! the autopilot telemetry record.
//!
//! # Mode transitions
//!
//! Locks are only written when the effective mode changes:
//! - master switch off (or mode off) after an engaged mode clears every lock once
//! - a new engaged mode writes its full lock row, points the payload
//!   straight down and fills in a cruise speed if none is set
//! - `cas` additionally captures the current attitude as its targets,
//!   clamped to ±45° roll and ±15° pitch

use super::cascade::ControlCascade;
use super::locks::{LockAssignment, PointingCommand};
use super::mode::FcsMode;
use super::telemetry::{RateDecimator, TelemetryOutputs, TelemetryRecord, HOME_INDEX};
use crate::parameters::{AutopilotParams, ConfigError};
use crate::route::RouteManager;
use crate::state::FlightState;

const CAS_ROLL_LIMIT_DEG: f32 = 45.0;
const CAS_PITCH_LIMIT_DEG: f32 = 15.0;

/// Speed targets below this count as unset (kt)
const MIN_TARGET_SPEED_KT: f32 = 0.1;

/// Event header written to the flight log on every mode change
pub const MODE_EVENT_HEADER: &str = "control mode changed to:";

/// Autopilot mode state machine and telemetry source
pub struct AutopilotController {
    params: AutopilotParams,
    last_mode: FcsMode,
    link_decimator: RateDecimator,
    log_decimator: RateDecimator,
    telemetry_cursor: u16,
}

impl AutopilotController {
    pub fn new(params: AutopilotParams) -> Self {
        Self {
            link_decimator: RateDecimator::new(params.link_skip),
            log_decimator: RateDecimator::new(params.log_skip),
            params,
            last_mode: FcsMode::Off,
            telemetry_cursor: 0,
        }
    }

    /// Start a session: load the cascade and reset transition state
    pub fn init(&mut self, cascade: &mut dyn ControlCascade) -> Result<(), ConfigError> {
        cascade.init()?;
        self.last_mode = FcsMode::Off;
        self.link_decimator = RateDecimator::new(self.params.link_skip);
        self.log_decimator = RateDecimator::new(self.params.log_skip);
        self.telemetry_cursor = 0;
        crate::log_info!("autopilot: initialized");
        Ok(())
    }

    /// Reload cascade configuration without touching the engaged mode
    pub fn reinit(&mut self, cascade: &mut dyn ControlCascade) -> Result<(), ConfigError> {
        cascade.reinit()?;
        crate::log_info!("autopilot: cascade reloaded");
        Ok(())
    }

    pub fn close(&mut self) {
        crate::log_info!("autopilot: closed in mode {}", self.last_mode.name());
    }

    /// Run one autopilot tick
    ///
    /// # Arguments
    ///
    /// * `state` - Shared flight state
    /// * `dt` - Tick period (s)
    /// * `cascade` - Control cascade stepped while a mode is engaged
    /// * `route` - Route whose waypoints are walked by the telemetry record
    /// * `outputs` - Telemetry sinks
    pub fn update(
        &mut self,
        state: &mut FlightState,
        dt: f32,
        cascade: &mut dyn ControlCascade,
        route: &RouteManager,
        outputs: &mut TelemetryOutputs<'_>,
    ) {
        self.update_mode(state, outputs);

        if self.last_mode.is_engaged() {
            cascade.update(state, dt);
        }

        self.emit_telemetry(state, route, outputs);
    }

    fn update_mode(&mut self, state: &mut FlightState, outputs: &mut TelemetryOutputs<'_>) {
        let commanded = if state.command.master_switch {
            state.command.fcs_mode
        } else {
            FcsMode::Off
        };
        if commanded == self.last_mode {
            return;
        }

        if commanded.is_engaged() {
            self.engage(state, commanded);
        } else {
            state.locks = LockAssignment::UNASSIGNED;
        }

        crate::log_info!(
            "Mode transition: {} -> {}",
            self.last_mode.name(),
            commanded.name()
        );
        if let Some(log) = outputs.log.as_deref_mut() {
            log.log_event(MODE_EVENT_HEADER, commanded.name());
        }
        self.last_mode = commanded;
    }

    fn engage(&self, state: &mut FlightState, mode: FcsMode) {
        state.locks = LockAssignment::for_mode(mode);
        state.pointing = PointingCommand::nadir();

        if mode == FcsMode::Cas {
            state.targets.roll_deg = state
                .nav
                .roll_deg
                .clamp(-CAS_ROLL_LIMIT_DEG, CAS_ROLL_LIMIT_DEG);
            state.targets.pitch_base_deg = state
                .nav
                .pitch_deg
                .clamp(-CAS_PITCH_LIMIT_DEG, CAS_PITCH_LIMIT_DEG);
        }

        if state.targets.speed_kt < MIN_TARGET_SPEED_KT {
            state.targets.speed_kt = self.params.initial_speed_kt;
        }
    }

    fn emit_telemetry(
        &mut self,
        state: &FlightState,
        route: &RouteManager,
        outputs: &mut TelemetryOutputs<'_>,
    ) {
        let route_size = route.size();
        // Positions below `route_size` are waypoints; `route_size` is the home
        // slot, which only exists once a home point is set
        let last_slot = match route.home() {
            Some(_) => route_size,
            None => route_size.saturating_sub(1),
        };
        if self.telemetry_cursor > last_slot {
            self.telemetry_cursor = 0;
        }

        let (waypoint, index) = match (route.get_waypoint(self.telemetry_cursor), route.home()) {
            (Some(wp), _) => (*wp, self.telemetry_cursor),
            (None, Some(home)) => (*home, HOME_INDEX),
            (None, None) => return,
        };
        let record = TelemetryRecord {
            timestamp_s: state.time_s,
            targets: state.targets,
            route_size,
            waypoint,
            index,
        };

        if let Some(link) = outputs.link.as_deref_mut() {
            if self.link_decimator.is_due() {
                match link.send_autopilot(&record) {
                    Ok(()) => {
                        self.link_decimator.mark_sent();
                        self.telemetry_cursor += 1;
                        if self.telemetry_cursor > last_slot {
                            self.telemetry_cursor = 0;
                        }
                    }
                    Err(e) => {
                        crate::log_debug!("autopilot: telemetry send failed: {}", e.as_str())
                    }
                }
            } else {
                self.link_decimator.skip_tick();
            }
        }

        if let Some(log) = outputs.log.as_deref_mut() {
            if self.log_decimator.advance() {
                log.log_autopilot(&record);
            }
        }
    }

    /// Mode whose locks are currently applied
    pub fn engaged_mode(&self) -> FcsMode {
        self.last_mode
    }

    /// Route index the next telemetry record will carry
    pub fn telemetry_cursor(&self) -> u16 {
        self.telemetry_cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autopilot::locks::{LockLoop, LookAtMode};
    use crate::autopilot::telemetry::{LinkError, TelemetryLink, TelemetryLog};
    use crate::parameters::RouteParams;
    use crate::route::{Waypoint, WaypointMode};
    use nalgebra::Vector3;
    use std::string::{String, ToString};
    use std::vec::Vec;

    const ENGAGED: [FcsMode; 4] = [
        FcsMode::Basic,
        FcsMode::BasicAlt,
        FcsMode::BasicAltNav,
        FcsMode::Cas,
    ];

    #[derive(Default)]
    struct CountingCascade {
        steps: u32,
        inits: u32,
    }

    impl ControlCascade for CountingCascade {
        fn init(&mut self) -> Result<(), ConfigError> {
            self.inits += 1;
            Ok(())
        }

        fn update(&mut self, _state: &mut FlightState, _dt: f32) {
            self.steps += 1;
        }
    }

    #[derive(Default)]
    struct RecordingLink {
        sent: Vec<u16>,
        payloads: Vec<Waypoint>,
        fail: bool,
    }

    impl TelemetryLink for RecordingLink {
        fn send_autopilot(&mut self, record: &TelemetryRecord) -> Result<(), LinkError> {
            if self.fail {
                return Err(LinkError::Busy);
            }
            self.sent.push(record.index);
            self.payloads.push(record.waypoint);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLog {
        records: Vec<u16>,
        events: Vec<(String, String)>,
    }

    impl TelemetryLog for RecordingLog {
        fn log_autopilot(&mut self, record: &TelemetryRecord) {
            self.records.push(record.index);
        }

        fn log_event(&mut self, header: &str, message: &str) {
            self.events.push((header.to_string(), message.to_string()));
        }
    }

    fn params(link_skip: u32, log_skip: u32) -> AutopilotParams {
        AutopilotParams {
            initial_speed_kt: 25.0,
            link_skip,
            log_skip,
        }
    }

    fn route_of(n: usize) -> RouteManager {
        let mut route = RouteManager::new(RouteParams::default());
        for i in 0..n {
            let lon = -122.0 + i as f64 * 0.01;
            route
                .new_waypoint_fields(lon, 47.0, WaypointMode::Absolute)
                .unwrap();
        }
        route.swap();
        route.set_home(Waypoint::absolute(-122.5, 47.5, 100.0));
        route
    }

    fn engage(mode: FcsMode) -> FlightState {
        let mut state = FlightState::default();
        state.command.master_switch = true;
        state.command.fcs_mode = mode;
        state
    }

    /// Tick with no telemetry sinks
    fn tick(ctl: &mut AutopilotController, state: &mut FlightState, cascade: &mut CountingCascade) {
        let route = RouteManager::new(RouteParams::default());
        ctl.update(state, 0.02, cascade, &route, &mut TelemetryOutputs::none());
    }

    #[test]
    fn test_every_mode_pair_yields_exact_row() {
        for from in ENGAGED {
            for to in ENGAGED {
                let mut ctl = AutopilotController::new(params(0, 0));
                let mut cascade = CountingCascade::default();
                let mut state = engage(from);
                tick(&mut ctl, &mut state, &mut cascade);
                state.command.fcs_mode = to;
                tick(&mut ctl, &mut state, &mut cascade);

                assert_eq!(state.locks, LockAssignment::for_mode(to), "{:?} -> {:?}", from, to);
                assert_eq!(ctl.engaged_mode(), to);
            }
        }
    }

    #[test]
    fn test_same_mode_is_idempotent() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut state = engage(FcsMode::BasicAltNav);
        tick(&mut ctl, &mut state, &mut cascade);
        let locks = state.locks;

        // External edits between ticks are not overwritten without a transition
        state.locks.heading = None;
        tick(&mut ctl, &mut state, &mut cascade);
        assert_eq!(state.locks.heading, None);
        state.locks = locks;
        tick(&mut ctl, &mut state, &mut cascade);
        assert_eq!(state.locks, locks);
    }

    #[test]
    fn test_master_off_clears_once() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut log = RecordingLog::default();
        let route = RouteManager::new(RouteParams::default());
        let mut state = engage(FcsMode::Basic);

        let mut outputs = TelemetryOutputs {
            link: None,
            log: Some(&mut log),
        };
        ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        state.command.master_switch = false;
        ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        assert!(state.locks.is_unassigned());
        ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        drop(outputs);

        assert_eq!(ctl.engaged_mode(), FcsMode::Off);
        let names: Vec<&str> = log.events.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(names, ["basic", "off"]);
        assert!(log.events.iter().all(|(h, _)| h == MODE_EVENT_HEADER));
    }

    #[test]
    fn test_commanded_off_with_master_on_disengages() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut state = engage(FcsMode::Cas);
        tick(&mut ctl, &mut state, &mut cascade);
        state.command.fcs_mode = FcsMode::Off;
        tick(&mut ctl, &mut state, &mut cascade);
        assert!(state.locks.is_unassigned());
    }

    #[test]
    fn test_master_off_ignores_commanded_mode() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut state = engage(FcsMode::Basic);
        state.command.master_switch = false;
        tick(&mut ctl, &mut state, &mut cascade);
        assert!(state.locks.is_unassigned());
        assert_eq!(cascade.steps, 0);
    }

    #[test]
    fn test_engage_points_nadir() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut state = engage(FcsMode::BasicAlt);
        tick(&mut ctl, &mut state, &mut cascade);
        assert_eq!(state.locks.pointing, Some(LockLoop::On));
        assert_eq!(state.pointing.lookat_mode, LookAtMode::NedVector);
        assert_eq!(state.pointing.ned_vector, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_cas_clamps_attitude_targets() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut state = engage(FcsMode::Cas);
        state.nav.roll_deg = 60.0;
        state.nav.pitch_deg = -20.0;
        tick(&mut ctl, &mut state, &mut cascade);
        assert_eq!(state.targets.roll_deg, 45.0);
        assert_eq!(state.targets.pitch_base_deg, -15.0);
    }

    #[test]
    fn test_cas_keeps_small_attitude() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut state = engage(FcsMode::Cas);
        state.nav.roll_deg = -12.5;
        state.nav.pitch_deg = 4.0;
        tick(&mut ctl, &mut state, &mut cascade);
        assert_eq!(state.targets.roll_deg, -12.5);
        assert_eq!(state.targets.pitch_base_deg, 4.0);
    }

    #[test]
    fn test_speed_target_defaults_to_cruise() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut state = engage(FcsMode::Basic);
        tick(&mut ctl, &mut state, &mut cascade);
        assert_eq!(state.targets.speed_kt, 25.0);

        let mut state = engage(FcsMode::Basic);
        let mut ctl = AutopilotController::new(params(0, 0));
        state.targets.speed_kt = 31.0;
        tick(&mut ctl, &mut state, &mut cascade);
        assert_eq!(state.targets.speed_kt, 31.0);
    }

    #[test]
    fn test_cascade_runs_only_when_engaged() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        ctl.init(&mut cascade).unwrap();
        assert_eq!(cascade.inits, 1);

        let mut state = FlightState::default();
        tick(&mut ctl, &mut state, &mut cascade);
        assert_eq!(cascade.steps, 0);

        state.command.master_switch = true;
        state.command.fcs_mode = FcsMode::Basic;
        tick(&mut ctl, &mut state, &mut cascade);
        tick(&mut ctl, &mut state, &mut cascade);
        assert_eq!(cascade.steps, 2);

        ctl.reinit(&mut cascade).unwrap();
        assert_eq!(cascade.inits, 2);
        assert_eq!(ctl.engaged_mode(), FcsMode::Basic);
    }

    #[test]
    fn test_telemetry_walks_route_then_home() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut link = RecordingLink::default();
        let route = route_of(3);
        let mut state = FlightState::default();

        for _ in 0..6 {
            let mut outputs = TelemetryOutputs {
                link: Some(&mut link),
                log: None,
            };
            ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        }
        assert_eq!(link.sent, [0, 1, 2, HOME_INDEX, 0, 1]);
        assert_eq!(link.payloads[0], *route.get_waypoint(0).unwrap());
        assert_eq!(link.payloads[2], *route.get_waypoint(2).unwrap());
        assert_eq!(link.payloads[3], *route.home().unwrap());
    }

    #[test]
    fn test_failed_send_does_not_advance() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut link = RecordingLink {
            fail: true,
            ..RecordingLink::default()
        };
        let route = route_of(3);
        let mut state = FlightState::default();

        for _ in 0..3 {
            let mut outputs = TelemetryOutputs {
                link: Some(&mut link),
                log: None,
            };
            ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        }
        assert_eq!(ctl.telemetry_cursor(), 0);

        link.fail = false;
        let mut outputs = TelemetryOutputs {
            link: Some(&mut link),
            log: None,
        };
        ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        // Retried immediately once the link recovers
        assert_eq!(link.sent, [0]);
        assert_eq!(ctl.telemetry_cursor(), 1);
    }

    #[test]
    fn test_link_and_log_decimate_independently() {
        let mut ctl = AutopilotController::new(params(2, 1));
        let mut cascade = CountingCascade::default();
        let mut link = RecordingLink::default();
        let mut log = RecordingLog::default();
        let route = route_of(5);
        let mut state = FlightState::default();

        for _ in 0..7 {
            let mut outputs = TelemetryOutputs {
                link: Some(&mut link),
                log: Some(&mut log),
            };
            ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        }
        // Link on ticks 0, 3, 6; log on ticks 0, 2, 4, 6
        assert_eq!(link.sent, [0, 1, 2]);
        assert_eq!(log.records.len(), 4);
    }

    #[test]
    fn test_home_record_without_route() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut link = RecordingLink::default();
        let mut route = RouteManager::new(RouteParams::default());
        let home = Waypoint::absolute(-122.5, 47.5, 100.0);
        route.set_home(home);
        let mut state = FlightState::default();

        for _ in 0..2 {
            let mut outputs = TelemetryOutputs {
                link: Some(&mut link),
                log: None,
            };
            ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        }
        assert_eq!(link.sent, [HOME_INDEX, HOME_INDEX]);
        assert_eq!(link.payloads, [home, home]);
    }

    #[test]
    fn test_no_home_slot_until_home_is_set() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut link = RecordingLink::default();
        let mut log = RecordingLog::default();
        let mut route = RouteManager::new(RouteParams::default());
        route.new_waypoint("-122.0,47.0").unwrap();
        route.new_waypoint("-122.1,47.0").unwrap();
        assert!(route.swap());
        let mut state = FlightState::default();

        for _ in 0..5 {
            let mut outputs = TelemetryOutputs {
                link: Some(&mut link),
                log: Some(&mut log),
            };
            ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        }
        assert_eq!(link.sent, [0, 1, 0, 1, 0]);

        // Empty route and no home: nothing to report
        let empty = RouteManager::new(RouteParams::default());
        let mut outputs = TelemetryOutputs {
            link: Some(&mut link),
            log: Some(&mut log),
        };
        ctl.update(&mut state, 0.02, &mut cascade, &empty, &mut outputs);
        assert_eq!(link.sent.len(), 5);
        assert_eq!(log.records.len(), 5);
    }

    #[test]
    fn test_cursor_resets_when_route_shrinks() {
        let mut ctl = AutopilotController::new(params(0, 0));
        let mut cascade = CountingCascade::default();
        let mut link = RecordingLink::default();
        let mut route = route_of(4);
        let mut state = FlightState::default();

        for _ in 0..4 {
            let mut outputs = TelemetryOutputs {
                link: Some(&mut link),
                log: None,
            };
            ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        }
        assert_eq!(ctl.telemetry_cursor(), 4);

        route.clear_standby();
        route.new_waypoint("-122.0,47.0").unwrap();
        assert!(route.swap());

        let mut outputs = TelemetryOutputs {
            link: Some(&mut link),
            log: None,
        };
        ctl.update(&mut state, 0.02, &mut cascade, &route, &mut outputs);
        assert_eq!(link.sent.last(), Some(&0));
    }
}
