//! Navigation subsystem
//!
//! - [`backend`]: Filter backend trait, scheduling profile and factory
//! - [`manager`]: Per-tick orchestration of the configured backends
//! - [`types`]: Sensor samples and the fused estimate
//! - [`geo`]: Course/distance, destination point and wind triangle

pub mod backend;
pub mod geo;
pub mod manager;
mod types;

pub use backend::{BackendFactory, BackendProfile, NavigationBackend};
pub use manager::{FilterLabel, FilterOutput, NavigationManager, FILTER_SECTION, MAX_FILTERS};
pub use types::{GpsMeasurement, GpsSample, ImuSample, InitialState, NavSolution};
