//! Flight core
//!
//! Owns the three flight-control components and runs them in the fixed
//! intra-tick order:
//!
//! 1. `NavigationManager` fuses the latched IMU/GPS samples
//! 2. `RouteManager` computes guidance from the new estimate
//! 3. `AutopilotController` applies mode changes, steps the cascade and
//!    emits telemetry
//!
//! Sensor drivers fill `FlightState` inputs before `tick`; nothing in here
//! blocks or allocates per tick.

use crate::autopilot::{AutopilotController, ControlCascade, TelemetryOutputs};
use crate::navigation::{BackendFactory, NavigationManager};
use crate::parameters::{
    AutopilotParams, ConfigError, ConfigSection, NavigationParams, ParameterError,
    ParameterStore, RouteParams,
};
use crate::route::RouteManager;
use crate::state::FlightState;

/// Navigation, route and autopilot in tick order
pub struct FlightCore {
    pub navigation: NavigationManager,
    pub route: RouteManager,
    pub autopilot: AutopilotController,
}

impl FlightCore {
    /// Register every parameter group with its defaults
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        NavigationParams::register_defaults(store)?;
        RouteParams::register_defaults(store)?;
        AutopilotParams::register_defaults(store)?;
        Ok(())
    }

    /// Build the components from the parameter store
    pub fn new(store: &ParameterStore) -> Self {
        Self {
            navigation: NavigationManager::new(NavigationParams::from_store(store)),
            route: RouteManager::new(RouteParams::from_store(store)),
            autopilot: AutopilotController::new(AutopilotParams::from_store(store)),
        }
    }

    /// Start a session
    ///
    /// Any error means the configuration is structurally broken and the
    /// aircraft must not fly.
    pub fn init(
        &mut self,
        filters: &[ConfigSection],
        route: &[ConfigSection],
        factory: &mut dyn BackendFactory,
        cascade: &mut dyn ControlCascade,
    ) -> Result<(), ConfigError> {
        self.navigation.init(filters, factory)?;
        self.route.init(route)?;
        self.autopilot.init(cascade)?;
        crate::log_info!(
            "flight core: {} filters, {} waypoints",
            self.navigation.filter_count(),
            self.route.size()
        );
        Ok(())
    }

    /// Run one tick
    pub fn tick(
        &mut self,
        state: &mut FlightState,
        fresh_imu: bool,
        dt: f32,
        cascade: &mut dyn ControlCascade,
        outputs: &mut TelemetryOutputs<'_>,
    ) {
        self.navigation.update(state, fresh_imu);
        self.route.update(state);
        self.autopilot
            .update(state, dt, cascade, &self.route, outputs);
    }

    /// End the session
    pub fn close(&mut self) {
        self.navigation.close();
        self.autopilot.close();
    }
}
