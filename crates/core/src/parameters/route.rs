//! Route Manager Parameter Definitions
//!
//! # Parameters
//!
//! - `WP_RADIUS` - Distance at which the current waypoint counts as reached (m)
//! - `WP_GPS_AGE` - Oldest GPS fix still used for route guidance (s)

use super::error::ParameterError;
use super::storage::{load_float, ParamFlags, ParamValue, ParameterStore};

// --- Defaults ---

const DEFAULT_WP_RADIUS: f32 = 50.0;
const DEFAULT_GPS_MAX_AGE: f32 = 10.0;

// --- Ranges ---

const MIN_WP_RADIUS: f32 = 1.0;
const MAX_WP_RADIUS: f32 = 1000.0;

const MIN_GPS_MAX_AGE: f32 = 0.1;
const MAX_GPS_MAX_AGE: f32 = 60.0;

/// Route manager parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct RouteParams {
    /// Waypoint capture radius (m)
    pub wp_radius_m: f32,
    /// Maximum GPS age for guidance (s)
    pub gps_max_age_s: f32,
}

impl Default for RouteParams {
    fn default() -> Self {
        Self {
            wp_radius_m: DEFAULT_WP_RADIUS,
            gps_max_age_s: DEFAULT_GPS_MAX_AGE,
        }
    }
}

impl RouteParams {
    /// Register route parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "WP_RADIUS",
            ParamValue::Float(DEFAULT_WP_RADIUS as f64),
            ParamFlags::empty(),
        )?;
        store.register(
            "WP_GPS_AGE",
            ParamValue::Float(DEFAULT_GPS_MAX_AGE as f64),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load route parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            wp_radius_m: load_float(
                store,
                "WP_RADIUS",
                DEFAULT_WP_RADIUS,
                MIN_WP_RADIUS,
                MAX_WP_RADIUS,
            ),
            gps_max_age_s: load_float(
                store,
                "WP_GPS_AGE",
                DEFAULT_GPS_MAX_AGE,
                MIN_GPS_MAX_AGE,
                MAX_GPS_MAX_AGE,
            ),
        }
    }

    /// Validate route parameters
    pub fn is_valid(&self) -> bool {
        (MIN_WP_RADIUS..=MAX_WP_RADIUS).contains(&self.wp_radius_m)
            && (MIN_GPS_MAX_AGE..=MAX_GPS_MAX_AGE).contains(&self.gps_max_age_s)
    }
}
