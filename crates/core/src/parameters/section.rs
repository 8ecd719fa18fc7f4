//! Configuration Sections
//!
//! An ordered, named group of typed fields. Navigation filters and route
//! waypoints are both configured as a list of sections:
//!
//! ```text
//! filter { module = "mnav" }
//! filter { module = "umn" }
//! wpt    { lon = -122.5, lat = 47.2, alt-ft = 500 }
//! enable { }
//! ```
//!
//! Reading the sections from a file is left to the integrator.

use super::error::{ConfigError, ParameterError};
use super::storage::ParamValue;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum section or field name length
pub const SECTION_NAME_LEN: usize = 24;

/// Maximum number of fields per section (power of two for the index map)
pub const MAX_SECTION_FIELDS: usize = 8;

/// Section and field name type
pub type SectionName = String<SECTION_NAME_LEN>;

/// A named configuration section with insertion-ordered fields
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSection {
    name: SectionName,
    fields: FnvIndexMap<SectionName, ParamValue, MAX_SECTION_FIELDS>,
}

impl ConfigSection {
    /// Create an empty section
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            name: to_name(name)?,
            fields: FnvIndexMap::new(),
        })
    }

    /// Builder-style field insertion
    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Result<Self, ConfigError> {
        self.insert(key, value.into())?;
        Ok(self)
    }

    /// Builder-style string field insertion
    pub fn with_text(mut self, key: &str, value: &str) -> Result<Self, ConfigError> {
        self.insert(key, ParamValue::text(value)?)?;
        Ok(self)
    }

    /// Insert or replace a field
    pub fn insert(&mut self, key: &str, value: ParamValue) -> Result<(), ConfigError> {
        self.fields
            .insert(to_name(key)?, value)
            .map_err(|_| ConfigError::CapacityExceeded("section fields"))?;
        Ok(())
    }

    /// Section name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        let key: SectionName = String::try_from(key).ok()?;
        self.fields.get(&key)
    }

    /// Look up a string field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    /// Look up a numeric field
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ParamValue::as_f64)
    }

    /// Fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Name of the section as an owned error payload
    pub(crate) fn name_owned(&self) -> SectionName {
        self.name.clone()
    }

    /// Error for a field whose value has the wrong type or range
    pub(crate) fn invalid_field(&self, key: &str) -> ConfigError {
        match to_name(key) {
            Ok(key) => ConfigError::InvalidValue { key },
            Err(e) => e,
        }
    }
}

fn to_name(s: &str) -> Result<SectionName, ConfigError> {
    let mut name = SectionName::new();
    name.push_str(s)
        .map_err(|_| ConfigError::Parameter(ParameterError::InvalidConfig))?;
    Ok(name)
}
