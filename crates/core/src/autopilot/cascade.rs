//! Control cascade seam
//!
//! The cascade is the chain of PID stages that turns the targets and lock
//! assignment in `FlightState` into surface and throttle commands. Its
//! numerics live outside this crate.

use crate::parameters::ConfigError;
use crate::state::FlightState;

/// Control cascade driven by the autopilot controller
pub trait ControlCascade {
    /// Load stage configuration
    fn init(&mut self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Reload stage configuration after a tuning change
    fn reinit(&mut self) -> Result<(), ConfigError> {
        self.init()
    }

    /// One control step over `dt` seconds
    fn update(&mut self, state: &mut FlightState, dt: f32);
}
