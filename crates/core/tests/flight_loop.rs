use skyroute_core::autopilot::{
    ControlCascade, FcsMode, LinkError, LockAssignment, TelemetryLink, TelemetryOutputs,
    TelemetryRecord, HOME_INDEX,
};
use skyroute_core::navigation::geo::offset_position;
use skyroute_core::navigation::{
    BackendProfile, GpsMeasurement, GpsSample, ImuSample, InitialState, NavSolution,
    NavigationBackend,
};
use skyroute_core::parameters::{ConfigError, ConfigSection, ParamValue, ParameterStore};
use skyroute_core::route::Waypoint;
use skyroute_core::{FlightCore, FlightState};

const HOME_LAT: f64 = 47.0;
const HOME_LON: f64 = -122.0;
const DT: f32 = 0.1;
const AIRSPEED_MPS: f64 = 20.0;

/// Filter that reports the GPS fix as its estimate once seeded.
#[derive(Default)]
struct GpsPassThrough {
    solution: NavSolution,
}

impl NavigationBackend for GpsPassThrough {
    fn profile(&self) -> BackendProfile {
        BackendProfile::seeded()
    }

    fn init(&mut self, _section: &ConfigSection) -> Result<(), ConfigError> {
        Ok(())
    }

    fn seed_initial_state(&mut self, seed: &InitialState) {
        self.solution.lat_deg = seed.lat_rad.to_degrees();
        self.solution.lon_deg = seed.lon_rad.to_degrees();
        self.solution.alt_m = -seed.down_m;
        self.solution.healthy = true;
    }

    fn update_position_velocity(&mut self, _imu: &ImuSample, gps: Option<&GpsMeasurement>) {
        if let Some(gps) = gps {
            self.solution.lat_deg = gps.lat_rad.to_degrees();
            self.solution.lon_deg = gps.lon_rad.to_degrees();
            self.solution.alt_m = -gps.down_m;
            self.solution.vel_ned = gps.vel_ned;
        }
    }

    fn solution(&self) -> NavSolution {
        self.solution
    }
}

fn backend_factory(module: &str) -> Option<Box<dyn NavigationBackend>> {
    match module {
        "passthrough" => Some(Box::new(GpsPassThrough::default())),
        _ => None,
    }
}

#[derive(Default)]
struct CountingCascade {
    steps: u32,
}

impl ControlCascade for CountingCascade {
    fn update(&mut self, _state: &mut FlightState, _dt: f32) {
        self.steps += 1;
    }
}

#[derive(Default)]
struct RecordingLink {
    indices: Vec<u16>,
    payloads: Vec<Waypoint>,
}

impl TelemetryLink for RecordingLink {
    fn send_autopilot(&mut self, record: &TelemetryRecord) -> Result<(), LinkError> {
        self.indices.push(record.index);
        self.payloads.push(record.waypoint);
        Ok(())
    }
}

fn filters() -> Vec<ConfigSection> {
    vec![
        ConfigSection::new("filter")
            .unwrap()
            .with_text("module", "ekf15")
            .unwrap(),
        ConfigSection::new("filter")
            .unwrap()
            .with_text("module", "passthrough")
            .unwrap(),
    ]
}

fn wpt_at(bearing_deg: f64, distance_m: f64, from: (f64, f64)) -> (ConfigSection, (f64, f64)) {
    let (lat, lon) = offset_position(from.0, from.1, bearing_deg, distance_m);
    let section = ConfigSection::new("wpt")
        .unwrap()
        .with("lon", lon)
        .unwrap()
        .with("lat", lat)
        .unwrap()
        .with("alt-ft", 500)
        .unwrap();
    (section, (lat, lon))
}

/// Box pattern: north, east, south, then home
fn box_route() -> Vec<ConfigSection> {
    let (a, pa) = wpt_at(0.0, 300.0, (HOME_LAT, HOME_LON));
    let (b, pb) = wpt_at(90.0, 300.0, pa);
    let (c, _) = wpt_at(180.0, 300.0, pb);
    vec![ConfigSection::new("enable").unwrap(), a, b, c]
}

fn new_core() -> FlightCore {
    let mut store = ParameterStore::new();
    FlightCore::register_defaults(&mut store).unwrap();
    store.set("AP_LINK_SKIP", ParamValue::Int(0)).unwrap();
    let mut core = FlightCore::new(&store);
    core.route
        .set_home(Waypoint::absolute(HOME_LON, HOME_LAT, 120.0));
    core
}

/// Point-mass aircraft flying the published wind-corrected heading.
struct Sim {
    lat: f64,
    lon: f64,
    time_s: f64,
}

impl Sim {
    fn new() -> Self {
        Self {
            lat: HOME_LAT,
            lon: HOME_LON,
            time_s: 0.0,
        }
    }

    fn latch_sensors(&self, state: &mut FlightState) {
        state.time_s = self.time_s;
        state.gps = Some(GpsSample {
            timestamp_s: self.time_s,
            lat_deg: self.lat,
            lon_deg: self.lon,
            alt_m: 150.0,
            ..GpsSample::default()
        });
    }

    fn advance(&mut self, state: &FlightState) {
        let heading = state.wind.target_heading_deg as f64;
        let (lat, lon) = offset_position(self.lat, self.lon, heading, AIRSPEED_MPS * DT as f64);
        self.lat = lat;
        self.lon = lon;
        self.time_s += DT as f64;
    }
}

#[test]
fn flies_box_route_and_returns_home() {
    let mut core = new_core();
    let mut cascade = CountingCascade::default();
    let mut factory = backend_factory;
    core.init(&filters(), &box_route(), &mut factory, &mut cascade)
        .unwrap();
    // Unknown "ekf15" skipped, pass-through published as filter[1]
    assert_eq!(core.navigation.filter_count(), 1);
    assert_eq!(core.route.size(), 3);

    let mut state = FlightState::default();
    state.command.master_switch = true;
    state.command.fcs_mode = FcsMode::BasicAltNav;

    let mut sim = Sim::new();
    let mut link = RecordingLink::default();
    let ticks = 1200;
    for _ in 0..ticks {
        sim.latch_sensors(&mut state);
        let mut outputs = TelemetryOutputs {
            link: Some(&mut link),
            log: None,
        };
        core.tick(&mut state, true, DT, &mut cascade, &mut outputs);
        sim.advance(&state);
    }

    assert!(core.navigation.is_seeded(0));
    assert_eq!(state.filters[0].label.as_str(), "filter[1]");
    assert!(state.nav.healthy);

    assert_eq!(core.route.active().current_index(), 3);
    assert_eq!(state.route.target_waypoint_idx, 3);
    assert!(state.route.wp_dist_m < 50.0, "{}", state.route.wp_dist_m);

    assert_eq!(state.locks, LockAssignment::for_mode(FcsMode::BasicAltNav));
    assert_eq!(cascade.steps, ticks);

    // Telemetry cycles 0, 1, 2, home
    assert_eq!(&link.indices[..5], &[0, 1, 2, HOME_INDEX, 0]);
    assert_eq!(link.payloads[3], *core.route.home().unwrap());
    assert_eq!(link.payloads[1], *core.route.get_waypoint(1).unwrap());
}

#[test]
fn waypoint_altitude_becomes_target() {
    let mut core = new_core();
    let mut cascade = CountingCascade::default();
    let mut factory = backend_factory;
    core.init(&filters(), &box_route(), &mut factory, &mut cascade)
        .unwrap();

    let mut state = FlightState::default();
    let sim = Sim::new();
    sim.latch_sensors(&mut state);
    core.tick(&mut state, true, DT, &mut cascade, &mut TelemetryOutputs::none());

    match state.targets.altitude {
        Some(skyroute_core::state::AltitudeTarget::MslFt(ft)) => assert!((ft - 500.0).abs() < 0.01),
        other => panic!("unexpected altitude target {:?}", other),
    }

    state.command.override_agl_ft = 250.0;
    core.tick(&mut state, true, DT, &mut cascade, &mut TelemetryOutputs::none());
    assert_eq!(
        state.targets.altitude,
        Some(skyroute_core::state::AltitudeTarget::AglFt(250.0))
    );
}

#[test]
fn master_switch_off_stops_cascade() {
    let mut core = new_core();
    let mut cascade = CountingCascade::default();
    let mut factory = backend_factory;
    core.init(&filters(), &box_route(), &mut factory, &mut cascade)
        .unwrap();

    let mut state = FlightState::default();
    state.command.master_switch = true;
    state.command.fcs_mode = FcsMode::Cas;
    let mut sim = Sim::new();

    for _ in 0..5 {
        sim.latch_sensors(&mut state);
        core.tick(&mut state, true, DT, &mut cascade, &mut TelemetryOutputs::none());
        sim.advance(&state);
    }
    state.command.master_switch = false;
    for _ in 0..5 {
        sim.latch_sensors(&mut state);
        core.tick(&mut state, true, DT, &mut cascade, &mut TelemetryOutputs::none());
        sim.advance(&state);
    }

    assert_eq!(cascade.steps, 5);
    assert!(state.locks.is_unassigned());
    assert_eq!(core.autopilot.engaged_mode(), FcsMode::Off);
}

#[test]
fn route_swap_takes_effect_on_next_tick() {
    let mut core = new_core();
    let mut cascade = CountingCascade::default();
    let mut factory = backend_factory;
    core.init(&filters(), &box_route(), &mut factory, &mut cascade)
        .unwrap();

    let mut state = FlightState::default();
    let sim = Sim::new();
    sim.latch_sensors(&mut state);
    core.tick(&mut state, true, DT, &mut cascade, &mut TelemetryOutputs::none());
    assert!(state.targets.groundtrack_deg < 1.0 || state.targets.groundtrack_deg > 359.0);

    // Upload a single waypoint due west; the active route keeps flying until swap
    let (lat, lon) = offset_position(HOME_LAT, HOME_LON, 270.0, 1000.0);
    core.route.clear_standby();
    core.route
        .new_waypoint(&format!("{},{}@400", lon, lat))
        .unwrap();
    core.tick(&mut state, true, DT, &mut cascade, &mut TelemetryOutputs::none());
    assert_eq!(core.route.size(), 3);

    assert!(core.route.swap());
    core.tick(&mut state, true, DT, &mut cascade, &mut TelemetryOutputs::none());
    assert_eq!(core.route.size(), 1);
    assert!((state.targets.groundtrack_deg - 270.0).abs() < 0.1);
}

#[test]
fn unknown_route_section_is_fatal() {
    let mut core = new_core();
    let mut cascade = CountingCascade::default();
    let mut factory = backend_factory;
    let mut route = box_route();
    route.push(ConfigSection::new("circle").unwrap());

    let err = core
        .init(&filters(), &route, &mut factory, &mut cascade)
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown config section 'circle'");
}

#[test]
fn filter_without_module_is_fatal() {
    let mut core = new_core();
    let mut cascade = CountingCascade::default();
    let mut factory = backend_factory;
    let sections = vec![ConfigSection::new("filter").unwrap()];

    let err = core
        .init(&sections, &box_route(), &mut factory, &mut cascade)
        .unwrap_err();
    assert_eq!(err.to_string(), "section 'filter' is missing field 'module'");
}
