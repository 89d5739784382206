//! Modelled requester on the far side of the device port.

use lut_core::{Packet, ResponseReceiver, Tick};
use serde::{Deserialize, Serialize};

/// How the requester pushes back on timing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Backpressure {
    /// Number of times each response is refused before it is accepted.
    pub reject_first: u32,
    /// Ticks between a refusal and the matching retry signal.
    pub retry_delay: Tick,
}

impl Backpressure {
    /// Policy that accepts every response on first offer.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            reject_first: 0,
            retry_delay: 0,
        }
    }
}

/// A response the requester accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    /// Tick the response was accepted.
    pub tick: Tick,
    /// The response packet.
    pub packet: Packet,
}

/// Requester that collects timing responses and refuses them per policy.
#[derive(Debug, Default)]
pub struct Requester {
    policy: Backpressure,
    now: Tick,
    refused_current: u32,
    retry_due: Option<Tick>,
    received: Vec<Received>,
    refusals: u64,
}

impl Requester {
    /// Creates a requester using `policy`.
    #[must_use]
    pub fn new(policy: Backpressure) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Updates the requester's view of simulated time.
    #[allow(clippy::missing_const_for_fn)]
    pub fn set_now(&mut self, now: Tick) {
        self.now = now;
    }

    /// Takes the tick of a retry signal owed after a refusal.
    #[allow(clippy::missing_const_for_fn)]
    pub fn take_retry_due(&mut self) -> Option<Tick> {
        self.retry_due.take()
    }

    /// Responses accepted so far, in arrival order.
    #[must_use]
    pub fn received(&self) -> &[Received] {
        &self.received
    }

    /// Consumes the requester, returning accepted responses.
    #[must_use]
    pub fn into_received(self) -> Vec<Received> {
        self.received
    }

    /// Total refusals issued.
    #[must_use]
    pub const fn refusals(&self) -> u64 {
        self.refusals
    }
}

impl ResponseReceiver for Requester {
    fn recv_timing_resp(&mut self, pkt: Packet) -> Result<(), Packet> {
        if self.refused_current < self.policy.reject_first {
            self.refused_current += 1;
            self.refusals += 1;
            self.retry_due = Some(self.now.saturating_add(self.policy.retry_delay));
            tracing::trace!(tag = pkt.tag(), tick = self.now, "requester busy");
            return Err(pkt);
        }

        self.refused_current = 0;
        self.received.push(Received {
            tick: self.now,
            packet: pkt,
        });
        Ok(())
    }
}
