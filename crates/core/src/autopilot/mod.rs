//! Autopilot
//!
//! - [`mode`]: Flight-control-system modes
//! - [`locks`]: Mode to lock-assignment table and pointing command
//! - [`controller`]: Mode state machine, cascade stepping, telemetry
//! - [`cascade`]: Control cascade trait
//! - [`telemetry`]: Telemetry record, sinks and rate decimation

pub mod cascade;
pub mod controller;
pub mod locks;
pub mod mode;
pub mod telemetry;

pub use cascade::ControlCascade;
pub use controller::{AutopilotController, MODE_EVENT_HEADER};
pub use locks::{LockAssignment, LockLoop, LookAtMode, PointingCommand};
pub use mode::FcsMode;
pub use telemetry::{
    LinkError, RateDecimator, TelemetryLink, TelemetryLog, TelemetryOutputs, TelemetryRecord,
    HOME_INDEX,
};
