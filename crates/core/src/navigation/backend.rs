//! Navigation backend abstraction
//!
//! A backend is one sensor-fusion filter (an attitude-only AHRS with a
//! separate position stage, a full-state EKF, ...). The navigation manager
//! owns the scheduling; backends only implement the numerical steps.
//!
//! # Scheduling
//!
//! Each backend describes how it wants to be driven through a
//! [`BackendProfile`]:
//!
//! - attitude step on every tick that carries a fresh IMU sample
//! - position/velocity step every `nav_ratio` ticks
//! - optional cold-start seeding from a fresh GPS fix before any
//!   position/velocity step

use alloc::boxed::Box;

use super::types::{GpsMeasurement, ImuSample, InitialState, NavSolution};
use crate::parameters::{ConfigError, ConfigSection};

/// How the manager drives a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendProfile {
    /// Run `update_attitude` on every tick with a fresh IMU sample
    pub attitude_full_rate: bool,
    /// Run `update_position_velocity` once every this many ticks
    pub nav_ratio: u32,
    /// Hold position/velocity updates until seeded from a fresh GPS fix
    pub requires_seed: bool,
}

impl BackendProfile {
    /// AHRS with a decimated position/velocity stage
    pub const fn decimated(nav_ratio: u32) -> Self {
        Self {
            attitude_full_rate: true,
            nav_ratio,
            requires_seed: false,
        }
    }

    /// Recursive filter updated every tick once seeded
    pub const fn seeded() -> Self {
        Self {
            attitude_full_rate: false,
            nav_ratio: 1,
            requires_seed: true,
        }
    }
}

/// Navigation filter backend
pub trait NavigationBackend {
    /// Scheduling requirements
    fn profile(&self) -> BackendProfile;

    /// Configure from the backend's filter section; called once per session
    fn init(&mut self, section: &ConfigSection) -> Result<(), ConfigError>;

    /// Attitude step from a fresh IMU sample
    fn update_attitude(&mut self, _imu: &ImuSample) {}

    /// Position/velocity step
    ///
    /// `gps` is `None` until the first fix has been received.
    fn update_position_velocity(&mut self, imu: &ImuSample, gps: Option<&GpsMeasurement>);

    /// Cold-start seed, delivered at most once per session
    fn seed_initial_state(&mut self, _seed: &InitialState) {}

    /// Current estimate
    fn solution(&self) -> NavSolution;

    /// Release resources
    fn close(&mut self) {}
}

/// Creates backends by module name
///
/// Returning `None` means the module is unknown; the manager skips it.
pub trait BackendFactory {
    fn create(&mut self, module: &str) -> Option<Box<dyn NavigationBackend>>;
}

impl<F> BackendFactory for F
where
    F: FnMut(&str) -> Option<Box<dyn NavigationBackend>>,
{
    fn create(&mut self, module: &str) -> Option<Box<dyn NavigationBackend>> {
        self(module)
    }
}
