//! Host-facing contracts for embedding the device in a simulator.
//!
//! The event scheduler, the requester on the far side of the port and the
//! address-routing fabric are all owned by the host. The device only sees
//! them through the traits below, passed in at each call.

use crate::{AddrRange, Packet};

/// Simulated time in scheduler ticks.
pub type Tick = u64;

/// Scheduling capability injected into the device by its host.
pub trait EventScheduler {
    /// Current simulated tick.
    fn cur_tick(&self) -> Tick;

    /// Requests that the device's delivery callback run at tick `when`.
    ///
    /// The host later calls [`crate::LookupDevice::process_delivery_event`]
    /// at that tick.
    fn schedule_delivery(&mut self, when: Tick);
}

/// Requester side of the port: receives timing-mode responses.
pub trait ResponseReceiver {
    /// Offers a completed response to the requester.
    ///
    /// # Errors
    ///
    /// Returns the packet unchanged when the requester is busy. The requester
    /// must later signal readiness through
    /// [`crate::LookupDevice::recv_resp_retry`].
    fn recv_timing_resp(&mut self, pkt: Packet) -> Result<(), Packet>;
}

/// Address-routing fabric notified when a device announces its window.
pub trait RangeChangeListener {
    /// Records the ranges now served by the named port.
    fn recv_range_change(&mut self, port: &str, ranges: &[AddrRange]);
}

/// Simulation fidelity used for one access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AccessMode {
    /// Timing-oblivious inspection path.
    Functional,
    /// Synchronous path reporting a fixed latency.
    Atomic,
    /// Queued path with delayed, backpressure-aware delivery.
    #[default]
    Timing,
}

impl AccessMode {
    /// Lowercase name used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Functional => "functional",
            Self::Atomic => "atomic",
            Self::Timing => "timing",
        }
    }
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the single-entry [`crate::LookupDevice::access`] dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Response returned synchronously with no timing.
    Functional(Packet),
    /// Response returned synchronously with the elapsed latency.
    Atomic {
        /// Completed response.
        packet: Packet,
        /// Ticks the access is reported to take.
        latency: Tick,
    },
    /// Request accepted into the response queue.
    Timing {
        /// Whether the request was accepted; always `true` for this device.
        accepted: bool,
    },
}

impl AccessOutcome {
    /// Returns the synchronous response, if this mode produced one.
    #[must_use]
    pub const fn packet(&self) -> Option<&Packet> {
        match self {
            Self::Functional(packet) | Self::Atomic { packet, .. } => Some(packet),
            Self::Timing { .. } => None,
        }
    }
}
