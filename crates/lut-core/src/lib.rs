//! Memory-mapped lookup-table device for discrete-event simulators.

/// Host-facing scheduler, requester and fabric contracts.
pub mod api;
pub use api::{
    AccessMode, AccessOutcome, EventScheduler, RangeChangeListener, ResponseReceiver, Tick,
};

/// Construction-time error taxonomy.
pub mod error;
pub use error::ConfigError;

/// Address window and packet primitives.
pub mod memory;
pub use memory::{
    default_window, AddrRange, MemCmd, Packet, DEFAULT_WINDOW_BASE, DEFAULT_WINDOW_BYTES,
    MAX_ACCESS_BYTES,
};

/// Immutable key/value table and its built-in contents.
pub mod table;
pub use table::{LookupEntry, LookupTable, DEFAULT_ENTRIES};

/// Device construction parameters.
pub mod config;
pub use config::{LutConfig, DEFAULT_DEVICE_NAME, DEFAULT_LATENCY_TICKS};

/// Mode-independent request servicing.
pub mod handler;
pub use handler::{derive_key, handle_request, LookupOutcome};

/// FIFO of responses awaiting delivery.
pub mod queue;
pub use queue::ResponseQueue;

/// Single-slot delivery timer.
pub mod timer;
pub use timer::{DeliveryState, DeliveryTimer};

/// Response port toward the routing fabric.
pub mod port;
pub use port::ResponsePort;

/// Diagnostic counters.
pub mod stats;
pub use stats::LutStats;

/// The device itself.
pub mod device;
pub use device::LookupDevice;

#[cfg(test)]
use proptest as _;
