//! skyroute_core - Flight-control core for a fixed-wing UAV autopilot
//!
//! Turns raw inertial/GPS samples into a navigation estimate, maps the
//! commanded flight-control mode onto control-loop locks, and sequences the
//! aircraft through a route of waypoints.
//!
//! # Design Principles
//!
//! - **Pure no_std**: Fixed-capacity collections, no per-tick allocation
//! - **Typed shared state**: One [`state::FlightState`] passed by reference,
//!   one writer per field group
//! - **Trait abstractions**: Filter backends, the control cascade and the
//!   telemetry sinks are injected via traits
//!
//! # Modules
//!
//! - [`navigation`]: Filter backend orchestration and geodetic utilities
//! - [`route`]: Waypoints, double-buffered route and guidance
//! - [`autopilot`]: Mode state machine, lock table, telemetry
//! - [`parameters`]: Parameter store and configuration sections
//! - [`state`]: Shared flight state
//! - [`flight`]: Tick orchestration

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod logging;

pub mod autopilot;
pub mod flight;
pub mod navigation;
pub mod parameters;
pub mod route;
pub mod state;

pub use flight::FlightCore;
pub use state::FlightState;
