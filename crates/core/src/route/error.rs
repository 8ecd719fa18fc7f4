//! Route error types

/// Errors from runtime route edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    /// Route already holds `MAX_WAYPOINTS`
    RouteFull,
    /// Waypoint text could not be parsed
    InvalidWaypoint(&'static str),
}

impl RouteError {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteError::RouteFull => "route full",
            RouteError::InvalidWaypoint(reason) => reason,
        }
    }
}

impl core::fmt::Display for RouteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RouteError::RouteFull => write!(f, "route is full"),
            RouteError::InvalidWaypoint(reason) => write!(f, "invalid waypoint: {}", reason),
        }
    }
}
