//! Parameter and configuration error types
//!
//! `ParameterError` covers parameter store operations. `ConfigError` covers
//! structural problems in filter and route configuration, which are fatal at
//! initialization.

use super::section::SectionName;

/// Errors from parameter store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Invalid configuration (e.g., name too long, unknown parameter)
    InvalidConfig,
    /// Store is full
    StoreFull,
    /// Read-only parameter cannot be modified
    ReadOnly,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::InvalidConfig => write!(f, "invalid parameter configuration"),
            ParameterError::StoreFull => write!(f, "parameter store full"),
            ParameterError::ReadOnly => write!(f, "parameter is read-only"),
        }
    }
}

/// Structural configuration errors
///
/// Any of these aborts initialization; the caller must not fly on a
/// partially applied configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Section name not recognized in this context
    UnknownSection(SectionName),
    /// Required field missing from a section
    MissingField {
        section: SectionName,
        field: &'static str,
    },
    /// Field present but of the wrong type or out of range
    InvalidValue { key: SectionName },
    /// A fixed-capacity container overflowed
    CapacityExceeded(&'static str),
    /// Underlying parameter store failure
    Parameter(ParameterError),
}

impl ConfigError {
    /// Short description without the offending name, for log backends that
    /// cannot format heapless strings
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigError::UnknownSection(_) => "unknown section",
            ConfigError::MissingField { .. } => "missing field",
            ConfigError::InvalidValue { .. } => "invalid value",
            ConfigError::CapacityExceeded(_) => "capacity exceeded",
            ConfigError::Parameter(_) => "parameter store error",
        }
    }
}

impl From<ParameterError> for ConfigError {
    fn from(e: ParameterError) -> Self {
        ConfigError::Parameter(e)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::UnknownSection(name) => write!(f, "unknown config section '{}'", name),
            ConfigError::MissingField { section, field } => {
                write!(f, "section '{}' is missing field '{}'", section, field)
            }
            ConfigError::InvalidValue { key } => write!(f, "invalid value for '{}'", key),
            ConfigError::CapacityExceeded(what) => write!(f, "too many {}", what),
            ConfigError::Parameter(e) => write!(f, "{}", e),
        }
    }
}
