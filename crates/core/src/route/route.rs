//! Route storage
//!
//! An ordered list of waypoints with a cursor. The cursor runs from 0 to
//! `len()`; `len()` means the route is exhausted and guidance falls back to
//! the home point.

use heapless::Vec;

use super::error::RouteError;
use super::waypoint::Waypoint;

/// Maximum number of waypoints in a route
pub const MAX_WAYPOINTS: usize = 100;

/// Waypoint route with a progress cursor
#[derive(Debug, Clone)]
pub struct Route {
    /// Waypoint array (max 100 waypoints)
    waypoints: Vec<Waypoint, MAX_WAYPOINTS>,
    /// Index of the waypoint being tracked
    current_index: u16,
}

impl Default for Route {
    fn default() -> Self {
        Self::new()
    }
}

impl Route {
    /// Create a new empty route
    pub const fn new() -> Self {
        Self {
            waypoints: Vec::new(),
            current_index: 0,
        }
    }

    /// Get number of waypoints
    pub fn len(&self) -> u16 {
        self.waypoints.len() as u16
    }

    /// Check if route is empty
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Clear all waypoints and rewind the cursor
    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.current_index = 0;
    }

    /// Append a waypoint
    pub fn add_waypoint(&mut self, waypoint: Waypoint) -> Result<(), RouteError> {
        self.waypoints
            .push(waypoint)
            .map_err(|_| RouteError::RouteFull)
    }

    /// Get a waypoint by index
    pub fn get_waypoint(&self, index: u16) -> Option<&Waypoint> {
        self.waypoints.get(index as usize)
    }

    /// Get current waypoint index
    pub fn current_index(&self) -> u16 {
        self.current_index
    }

    /// Get current waypoint, `None` once the route is exhausted
    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.current_index as usize)
    }

    /// Advance the cursor by one, stopping at `len()`
    pub fn increment_current(&mut self) {
        if self.current_index < self.len() {
            self.current_index += 1;
        }
    }

    /// Position every relative waypoint against `anchor` and `ref_heading_deg`
    pub fn refresh_offset_positions(&mut self, anchor: &Waypoint, ref_heading_deg: f64) {
        for wp in self.waypoints.iter_mut() {
            wp.update_relative_pos(anchor, ref_heading_deg);
        }
    }
}
