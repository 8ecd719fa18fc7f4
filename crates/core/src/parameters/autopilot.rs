//! Autopilot Parameter Definitions
//!
//! # Parameters
//!
//! - `FCS_INIT_SPD` - Cruise speed substituted when a mode engages with no speed target (kt)
//! - `AP_LINK_SKIP` - Ticks skipped between autopilot records on the radio link
//! - `AP_LOG_SKIP` - Ticks skipped between autopilot records in the flight log

use super::error::ParameterError;
use super::storage::{load_count, load_float, ParamFlags, ParamValue, ParameterStore};

// --- Defaults ---

const DEFAULT_INITIAL_SPEED_KT: f32 = 25.0;
const DEFAULT_LINK_SKIP: u32 = 4;
const DEFAULT_LOG_SKIP: u32 = 0;

// --- Ranges ---

const MIN_INITIAL_SPEED_KT: f32 = 1.0;
const MAX_INITIAL_SPEED_KT: f32 = 200.0;
const MAX_SKIP: u32 = 1000;

/// Autopilot controller parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct AutopilotParams {
    /// Initial cruise speed (kt)
    pub initial_speed_kt: f32,
    /// Radio link decimation
    pub link_skip: u32,
    /// Flight log decimation
    pub log_skip: u32,
}

impl Default for AutopilotParams {
    fn default() -> Self {
        Self {
            initial_speed_kt: DEFAULT_INITIAL_SPEED_KT,
            link_skip: DEFAULT_LINK_SKIP,
            log_skip: DEFAULT_LOG_SKIP,
        }
    }
}

impl AutopilotParams {
    /// Register autopilot parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "FCS_INIT_SPD",
            ParamValue::Float(DEFAULT_INITIAL_SPEED_KT as f64),
            ParamFlags::empty(),
        )?;
        store.register(
            "AP_LINK_SKIP",
            ParamValue::Int(DEFAULT_LINK_SKIP as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "AP_LOG_SKIP",
            ParamValue::Int(DEFAULT_LOG_SKIP as i32),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load autopilot parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            initial_speed_kt: load_float(
                store,
                "FCS_INIT_SPD",
                DEFAULT_INITIAL_SPEED_KT,
                MIN_INITIAL_SPEED_KT,
                MAX_INITIAL_SPEED_KT,
            ),
            link_skip: load_count(store, "AP_LINK_SKIP", DEFAULT_LINK_SKIP, MAX_SKIP),
            log_skip: load_count(store, "AP_LOG_SKIP", DEFAULT_LOG_SKIP, MAX_SKIP),
        }
    }

    /// Validate autopilot parameters
    pub fn is_valid(&self) -> bool {
        (MIN_INITIAL_SPEED_KT..=MAX_INITIAL_SPEED_KT).contains(&self.initial_speed_kt)
            && self.link_skip <= MAX_SKIP
            && self.log_skip <= MAX_SKIP
    }
}
