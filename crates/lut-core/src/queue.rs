//! FIFO of completed timing-mode responses awaiting delivery.

use std::collections::VecDeque;

use crate::Packet;

/// Strict first-in first-out buffer of responses.
///
/// Responses leave in exactly the order they were accepted. A head that the
/// requester refused goes back to the front, so it is offered again before
/// anything queued behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseQueue {
    pending: VecDeque<Packet>,
}

impl ResponseQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a completed response behind everything already queued.
    ///
    /// # Panics
    ///
    /// Panics when `pkt` has not been turned into a response.
    pub fn push(&mut self, pkt: Packet) {
        assert!(
            pkt.is_response(),
            "only completed responses may be queued for delivery"
        );
        self.pending.push_back(pkt);
    }

    /// Removes the head for a delivery attempt.
    pub fn pop_head(&mut self) -> Option<Packet> {
        self.pending.pop_front()
    }

    /// Puts a refused head back in front of the queue.
    pub fn restore_head(&mut self, pkt: Packet) {
        self.pending.push_front(pkt);
    }

    /// Next response to be delivered.
    #[must_use]
    pub fn head(&self) -> Option<&Packet> {
        self.pending.front()
    }

    /// Number of queued responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` when nothing awaits delivery.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterates queued responses from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Packet> {
        self.pending.iter()
    }
}
