//! Discrete-event driver for the lookup-table device.

use clap as _;
#[cfg(test)]
use tempfile as _;
use tracing_subscriber as _;

/// Driver and CLI error types.
pub mod errors;
pub use errors::SimError;

/// Tick-ordered event queue implementing the device's scheduler contract.
pub mod event_queue;
pub use event_queue::{EventQueue, SimEvent};

/// Requester model with configurable back-pressure.
pub mod requester;
pub use requester::{Backpressure, Received, Requester};

/// Scenario files and the reference probe program.
pub mod scenario;
pub use scenario::{RequestKind, RequestSpec, Scenario, REFERENCE_BATCH_LOOKUPS};

/// Scenario execution and reporting.
pub mod runner;
pub use runner::{run_scenario, Completion, SimReport};
