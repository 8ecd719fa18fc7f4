//! Navigation Manager Parameter Definitions
//!
//! # Parameters
//!
//! - `NAV_SEED_AGE` - Oldest GPS fix accepted to seed a cold-start filter (s)

use super::error::ParameterError;
use super::storage::{load_float, ParamFlags, ParamValue, ParameterStore};

const DEFAULT_SEED_MAX_AGE: f32 = 1.0;

const MIN_SEED_MAX_AGE: f32 = 0.05;
const MAX_SEED_MAX_AGE: f32 = 5.0;

/// Navigation manager parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct NavigationParams {
    /// Maximum GPS age for cold-start seeding (s)
    pub seed_max_age_s: f32,
}

impl Default for NavigationParams {
    fn default() -> Self {
        Self {
            seed_max_age_s: DEFAULT_SEED_MAX_AGE,
        }
    }
}

impl NavigationParams {
    /// Register navigation parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "NAV_SEED_AGE",
            ParamValue::Float(DEFAULT_SEED_MAX_AGE as f64),
            ParamFlags::empty(),
        )
    }

    /// Load navigation parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            seed_max_age_s: load_float(
                store,
                "NAV_SEED_AGE",
                DEFAULT_SEED_MAX_AGE,
                MIN_SEED_MAX_AGE,
                MAX_SEED_MAX_AGE,
            ),
        }
    }
}
