//! Parameter and configuration types
//!
//! Tunable values live in the `ParameterStore`, loaded into one params struct
//! per subsystem. Structural configuration (which filters run, which
//! waypoints form the route) arrives as ordered `ConfigSection` lists.

pub mod autopilot;
pub mod error;
pub mod navigation;
pub mod route;
pub mod section;
pub mod storage;

pub use autopilot::AutopilotParams;
pub use error::{ConfigError, ParameterError};
pub use navigation::NavigationParams;
pub use route::RouteParams;
pub use section::{ConfigSection, SectionName, MAX_SECTION_FIELDS, SECTION_NAME_LEN};
pub use storage::{ParamFlags, ParamMetadata, ParamName, ParamValue, ParameterStore};
pub use storage::{MAX_PARAMS, MAX_STRING_LEN, PARAM_NAME_LEN};
