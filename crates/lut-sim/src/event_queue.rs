//! Minimal discrete-event queue driving a single device.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use lut_core::{EventScheduler, Tick};

/// Events the driver dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SimEvent {
    /// Requester issues scenario request `index`.
    Issue(usize),
    /// Device delivery callback.
    Deliver,
    /// Requester signals it can take the refused response.
    Retry,
}

/// Time-ordered event queue; events at the same tick run in the order they
/// were scheduled.
#[derive(Debug, Default)]
pub struct EventQueue {
    now: Tick,
    next_seq: u64,
    heap: BinaryHeap<Reverse<(Tick, u64, SimEvent)>>,
}

impl EventQueue {
    /// Creates an empty queue at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `event` at tick `when`, clamped to the current tick.
    pub fn schedule_at(&mut self, when: Tick, event: SimEvent) {
        let when = when.max(self.now);
        self.heap.push(Reverse((when, self.next_seq, event)));
        self.next_seq += 1;
    }

    /// Removes the earliest event and advances time to it.
    pub fn pop_next(&mut self) -> Option<SimEvent> {
        let Reverse((when, _, event)) = self.heap.pop()?;
        self.now = when;
        Some(event)
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` when no events are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending device delivery callbacks.
    #[must_use]
    pub fn pending_deliveries(&self) -> usize {
        self.heap
            .iter()
            .filter(|Reverse((_, _, event))| *event == SimEvent::Deliver)
            .count()
    }
}

impl EventScheduler for EventQueue {
    fn cur_tick(&self) -> Tick {
        self.now
    }

    fn schedule_delivery(&mut self, when: Tick) {
        self.schedule_at(when, SimEvent::Deliver);
    }
}

#[cfg(test)]
mod tests {
    use lut_core::EventScheduler;

    use super::{EventQueue, SimEvent};

    #[test]
    fn events_pop_in_tick_then_insertion_order() {
        let mut queue = EventQueue::new();
        queue.schedule_at(5, SimEvent::Retry);
        queue.schedule_at(2, SimEvent::Issue(1));
        queue.schedule_delivery(2);
        queue.schedule_at(0, SimEvent::Issue(0));

        let mut order = Vec::new();
        while let Some(event) = queue.pop_next() {
            order.push((queue.cur_tick(), event));
        }
        assert_eq!(
            order,
            vec![
                (0, SimEvent::Issue(0)),
                (2, SimEvent::Issue(1)),
                (2, SimEvent::Deliver),
                (5, SimEvent::Retry),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn past_ticks_are_clamped_to_now() {
        let mut queue = EventQueue::new();
        queue.schedule_at(10, SimEvent::Issue(0));
        queue.pop_next();
        queue.schedule_at(3, SimEvent::Retry);
        assert_eq!(queue.pop_next(), Some(SimEvent::Retry));
        assert_eq!(queue.cur_tick(), 10);
    }

    #[test]
    fn delivery_callbacks_are_counted() {
        let mut queue = EventQueue::new();
        queue.schedule_delivery(1);
        queue.schedule_at(1, SimEvent::Issue(0));
        assert_eq!(queue.pending_deliveries(), 1);
        assert_eq!(queue.len(), 2);
    }
}
