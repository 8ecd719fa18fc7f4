//! Parameter Storage Types
//!
//! Provides the typed parameter value shared by the `ParameterStore` and the
//! configuration sections, plus range-checked loaders used by the parameter
//! groups.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Registered parameter name
pub type ParamName = String<PARAM_NAME_LEN>;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 32;

/// Maximum string parameter length
pub const MAX_STRING_LEN: usize = 31;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Parameter is hidden from ground station listings
        const HIDDEN = 0b00000001;
        /// Parameter is read-only (cannot be modified at runtime)
        const READ_ONLY = 0b00000010;
    }
}

/// Parameter value types
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String parameter (max 31 chars)
    String(String<MAX_STRING_LEN>),
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit floating point (geodetic coordinates need the precision)
    Float(f64),
}

impl ParamValue {
    /// Get type discriminant
    pub fn type_id(&self) -> u8 {
        match self {
            ParamValue::String(_) => 0,
            ParamValue::Bool(_) => 1,
            ParamValue::Int(_) => 2,
            ParamValue::Float(_) => 3,
        }
    }

    /// Numeric view of the value; integers widen, other types yield `None`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// String view of the value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Build a string value, failing if it exceeds `MAX_STRING_LEN`
    pub fn text(value: &str) -> Result<Self, ParameterError> {
        let mut s = String::new();
        s.push_str(value)
            .map_err(|_| ParameterError::InvalidConfig)?;
        Ok(ParamValue::String(s))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

/// Parameter metadata
#[derive(Debug, Clone)]
pub struct ParamMetadata {
    /// Parameter flags
    pub flags: ParamFlags,
}

/// Parameter store for tunable flight-control settings
///
/// Parameter groups register their defaults here, the integrator overrides
/// values from its own configuration source, and each group then loads a
/// range-checked snapshot with `from_store`.
pub struct ParameterStore {
    /// Parameter values
    parameters: FnvIndexMap<ParamName, ParamValue, MAX_PARAMS>,
    /// Parameter metadata
    metadata: FnvIndexMap<ParamName, ParamMetadata, MAX_PARAMS>,
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            parameters: FnvIndexMap::new(),
            metadata: FnvIndexMap::new(),
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(&param_key(name).ok()?)
    }

    /// Set parameter value
    ///
    /// The parameter must have been registered first.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = param_key(name)?;
        let flags = self.flags(&key).ok_or(ParameterError::InvalidConfig)?;
        if flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }
        if let Some(slot) = self.parameters.get_mut(&key) {
            *slot = value;
        }
        Ok(())
    }

    /// Register a new parameter with default value and flags
    ///
    /// If the parameter already exists, this is a no-op (idempotent).
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = param_key(name)?;
        if self.parameters.contains_key(&key) {
            return Ok(());
        }

        self.parameters
            .insert(key.clone(), default_value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.metadata
            .insert(key, ParamMetadata { flags })
            .map_err(|_| ParameterError::StoreFull)?;
        Ok(())
    }

    /// Check if parameter is hidden
    pub fn is_hidden(&self, name: &str) -> bool {
        param_key(name)
            .ok()
            .and_then(|key| self.flags(&key))
            .is_some_and(|flags| flags.contains(ParamFlags::HIDDEN))
    }

    fn flags(&self, key: &ParamName) -> Option<ParamFlags> {
        self.metadata.get(key).map(|meta| meta.flags)
    }

    /// Get all parameter names (excluding hidden parameters)
    pub fn iter_names(&self) -> impl Iterator<Item = &ParamName> {
        self.parameters
            .keys()
            .filter(|name| !self.is_hidden(name.as_str()))
    }

    /// Get parameter count (excluding hidden parameters)
    pub fn count(&self) -> usize {
        self.iter_names().count()
    }

    /// Get total parameter count (including hidden parameters)
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

fn param_key(name: &str) -> Result<ParamName, ParameterError> {
    let mut key = ParamName::new();
    key.push_str(name)
        .map_err(|_| ParameterError::InvalidConfig)?;
    Ok(key)
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a float parameter from store with clamping
pub(crate) fn load_float(
    store: &ParameterStore,
    name: &str,
    default: f32,
    min: f32,
    max: f32,
) -> f32 {
    match store.get(name).and_then(ParamValue::as_f64) {
        Some(v) => (v as f32).clamp(min, max),
        None => default,
    }
}

/// Load a non-negative integer parameter from store with clamping
pub(crate) fn load_count(store: &ParameterStore, name: &str, default: u32, max: u32) -> u32 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => (*v).clamp(0, max as i32) as u32,
        Some(ParamValue::Float(v)) => (*v as i64).clamp(0, max as i64) as u32,
        _ => default,
    }
}
