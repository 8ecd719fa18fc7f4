//! Route management
//!
//! - [`waypoint`]: Waypoint model, text and config parsing
//! - [`route`]: Ordered waypoint storage with a cursor
//! - [`manager`]: Double-buffered active route and per-tick guidance

mod error;
pub mod manager;
pub mod route;
pub mod waypoint;

pub use error::RouteError;
pub use manager::{
    altitude_target, eta_seconds, RouteManager, ENABLE_SECTION, REPOSITION_EPSILON_DEG,
    WAYPOINT_SECTION,
};
pub use route::{Route, MAX_WAYPOINTS};
pub use waypoint::{Waypoint, WaypointMode, ALT_UNSET_M};
