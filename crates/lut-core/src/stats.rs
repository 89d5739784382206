//! Saturating diagnostic counters for one device instance.

use crate::{AccessMode, LookupOutcome};

/// Device-owned diagnostic counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LutStats {
    /// Reads whose key was present.
    pub hits: u64,
    /// Reads whose key was absent.
    pub misses: u64,
    /// Writes acknowledged without effect.
    pub writes_ignored: u64,
    /// Accesses taken through the functional path.
    pub functional_accesses: u64,
    /// Accesses taken through the atomic path.
    pub atomic_accesses: u64,
    /// Requests accepted through the timing path.
    pub timing_requests: u64,
    /// Timing responses the requester accepted.
    pub responses_delivered: u64,
    /// Delivery attempts the requester refused.
    pub responses_rejected: u64,
    /// Retry signals that restarted a refused delivery.
    pub retries: u64,
    /// Largest response-queue depth observed.
    pub peak_queue_depth: u64,
}

impl LutStats {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one access on the given path.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_access(&mut self, mode: AccessMode) {
        let counter = match mode {
            AccessMode::Functional => &mut self.functional_accesses,
            AccessMode::Atomic => &mut self.atomic_accesses,
            AccessMode::Timing => &mut self.timing_requests,
        };
        *counter = counter.saturating_add(1);
    }

    /// Counts the table outcome of one request.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_lookup(&mut self, outcome: LookupOutcome) {
        let counter = match outcome {
            LookupOutcome::Hit { .. } => &mut self.hits,
            LookupOutcome::Miss { .. } => &mut self.misses,
            LookupOutcome::WriteIgnored => &mut self.writes_ignored,
        };
        *counter = counter.saturating_add(1);
    }

    /// Counts an accepted delivery.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_delivery(&mut self) {
        self.responses_delivered = self.responses_delivered.saturating_add(1);
    }

    /// Counts a refused delivery.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_rejection(&mut self) {
        self.responses_rejected = self.responses_rejected.saturating_add(1);
    }

    /// Counts a retry signal that restarted delivery.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_retry(&mut self) {
        self.retries = self.retries.saturating_add(1);
    }

    /// Raises the peak queue depth to `depth` if it is larger.
    pub fn observe_queue_depth(&mut self, depth: usize) {
        let depth = u64::try_from(depth).unwrap_or(u64::MAX);
        self.peak_queue_depth = self.peak_queue_depth.max(depth);
    }

    /// Total reads serviced, hit or miss.
    #[must_use]
    pub const fn reads(&self) -> u64 {
        self.hits.saturating_add(self.misses)
    }
}
