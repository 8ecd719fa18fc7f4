//! Navigation Manager
//!
//! Drives the configured filter backends once per tick and publishes their
//! estimates. The first active backend is the canonical estimate read by the
//! rest of the flight core; every backend also publishes under its own label
//! (`filter[0]`, `filter[1]`, ...).
//!
//! # Seeding
//!
//! Backends whose profile requires a seed receive no position/velocity steps
//! until a GPS fix younger than `NavigationParams::seed_max_age_s` arrives.
//! They are seeded exactly once per session; a stale fix never blocks the
//! attitude steps of other backends.

use alloc::boxed::Box;
use core::fmt::Write;
use heapless::{String, Vec};

use super::backend::{BackendFactory, BackendProfile, NavigationBackend};
use super::types::{GpsMeasurement, InitialState, NavSolution};
use crate::parameters::{ConfigError, ConfigSection, NavigationParams};
use crate::state::FlightState;

/// Maximum number of simultaneously running filters
pub const MAX_FILTERS: usize = 4;

/// Section name that declares a filter
pub const FILTER_SECTION: &str = "filter";

/// Maximum length of a filter output label
pub const FILTER_LABEL_LEN: usize = 16;

/// Filter output label
pub type FilterLabel = String<FILTER_LABEL_LEN>;

/// Estimate published by one backend
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutput {
    pub label: FilterLabel,
    pub solution: NavSolution,
}

struct FilterSlot {
    label: FilterLabel,
    backend: Box<dyn NavigationBackend>,
    profile: BackendProfile,
    nav_counter: u32,
    seeded: bool,
}

/// Navigation filter orchestration
pub struct NavigationManager {
    slots: Vec<FilterSlot, MAX_FILTERS>,
    params: NavigationParams,
}

impl NavigationManager {
    pub fn new(params: NavigationParams) -> Self {
        Self {
            slots: Vec::new(),
            params,
        }
    }

    /// Create and configure backends from the ordered filter sections
    ///
    /// Sections not named `filter` are ignored. A filter section without a
    /// `module` field is a fatal configuration error; a module the factory
    /// does not know is skipped. Backends of a previous session are closed
    /// first, and on error every backend created so far is closed again.
    pub fn init(
        &mut self,
        sections: &[ConfigSection],
        factory: &mut dyn BackendFactory,
    ) -> Result<(), ConfigError> {
        self.close();

        let result = self.create_backends(sections, factory);
        if result.is_err() {
            self.close();
        }
        result
    }

    fn create_backends(
        &mut self,
        sections: &[ConfigSection],
        factory: &mut dyn BackendFactory,
    ) -> Result<(), ConfigError> {
        let filters = sections.iter().filter(|s| s.name() == FILTER_SECTION);
        for (index, section) in filters.enumerate() {
            let module = section
                .get_str("module")
                .ok_or_else(|| ConfigError::MissingField {
                    section: section.name_owned(),
                    field: "module",
                })?;

            let mut label = FilterLabel::new();
            write!(label, "{}[{}]", FILTER_SECTION, index)
                .map_err(|_| ConfigError::CapacityExceeded("filter label"))?;

            let Some(mut backend) = factory.create(module) else {
                crate::log_debug!("navigation: no backend for module {}, skipping", module);
                continue;
            };
            backend.init(section)?;

            crate::log_info!("navigation: {} -> {}", module, label.as_str());

            let profile = backend.profile();
            let slot = FilterSlot {
                label,
                backend,
                profile,
                nav_counter: 0,
                seeded: false,
            };
            if let Err(mut rejected) = self.slots.push(slot) {
                rejected.backend.close();
                return Err(ConfigError::CapacityExceeded("navigation filters"));
            }
        }

        Ok(())
    }

    /// Run one navigation tick
    ///
    /// # Arguments
    ///
    /// * `state` - Shared flight state; IMU and GPS are read, estimates written
    /// * `fresh_imu` - A new IMU sample arrived since the previous tick
    pub fn update(&mut self, state: &mut FlightState, fresh_imu: bool) {
        let imu = state.imu;
        let gps_age = state.gps_age_s();
        let gps = state.gps.as_ref().map(GpsMeasurement::from);
        let seed_max_age = self.params.seed_max_age_s as f64;

        for slot in self.slots.iter_mut() {
            if slot.profile.attitude_full_rate && fresh_imu {
                slot.backend.update_attitude(&imu);
            }

            if slot.profile.requires_seed && !slot.seeded {
                match state.gps.as_ref() {
                    Some(fix) if gps_age < seed_max_age => {
                        slot.backend.seed_initial_state(&InitialState::from(fix));
                        slot.seeded = true;
                        crate::log_info!(
                            "navigation: {} seeded at {}, {}",
                            slot.label.as_str(),
                            fix.lat_deg,
                            fix.lon_deg
                        );
                    }
                    _ => continue,
                }
            }

            slot.nav_counter += 1;
            if slot.nav_counter >= slot.profile.nav_ratio.max(1) {
                slot.nav_counter = 0;
                slot.backend.update_position_velocity(&imu, gps.as_ref());
            }
        }

        self.publish(state);
    }

    fn publish(&self, state: &mut FlightState) {
        state.filters.clear();
        for slot in self.slots.iter() {
            state
                .filters
                .push(FilterOutput {
                    label: slot.label.clone(),
                    solution: slot.backend.solution(),
                })
                .ok();
        }
        if let Some(first) = state.filters.first() {
            state.nav = first.solution;
        }
    }

    /// Shut down every backend in init order
    pub fn close(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.backend.close();
            crate::log_info!("navigation: {} closed", slot.label.as_str());
        }
        self.slots.clear();
    }

    /// Number of active backends
    pub fn filter_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether the backend at `index` has been seeded this session
    pub fn is_seeded(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.seeded)
    }
}
