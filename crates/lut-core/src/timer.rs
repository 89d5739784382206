//! Single-slot delivery timer for the response queue.

use crate::api::{EventScheduler, Tick};

/// Where the one in-flight delivery stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeliveryState {
    /// Nothing queued and nothing scheduled.
    #[default]
    Idle,
    /// A delivery callback is scheduled for `when`.
    Armed {
        /// Tick the scheduler will call back at.
        when: Tick,
    },
    /// The callback fired and the head is being offered to the requester.
    Attempting,
    /// The requester refused the head and owes a retry signal.
    AwaitingRetry,
}

/// Owns the single delivery slot of a device.
///
/// At most one delivery is ever armed, attempting or waiting for a retry.
/// Only the requester's retry signal moves a refused delivery forward; no
/// tick delay is charged for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryTimer {
    state: DeliveryState,
}

impl DeliveryTimer {
    /// Creates an idle timer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DeliveryState::Idle,
        }
    }

    /// Current slot state.
    #[must_use]
    pub const fn state(&self) -> DeliveryState {
        self.state
    }

    /// Returns `true` whenever a delivery is outstanding in any form.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        !matches!(self.state, DeliveryState::Idle)
    }

    /// Tick of the scheduled callback, when one is pending.
    #[must_use]
    pub const fn scheduled_at(&self) -> Option<Tick> {
        match self.state {
            DeliveryState::Armed { when } => Some(when),
            DeliveryState::Idle | DeliveryState::Attempting | DeliveryState::AwaitingRetry => None,
        }
    }

    /// Schedules the next delivery `delay` ticks from now and returns its tick.
    ///
    /// # Panics
    ///
    /// Panics when a delivery is already armed or waiting for a retry.
    pub fn arm<S>(&mut self, sched: &mut S, delay: Tick) -> Tick
    where
        S: EventScheduler + ?Sized,
    {
        assert!(
            matches!(
                self.state,
                DeliveryState::Idle | DeliveryState::Attempting
            ),
            "delivery timer armed twice (state {:?})",
            self.state
        );
        let when = sched.cur_tick().saturating_add(delay);
        sched.schedule_delivery(when);
        self.state = DeliveryState::Armed { when };
        when
    }

    /// Consumes the scheduled callback at `now`.
    ///
    /// Returns `false`, leaving the state alone, for a callback that does
    /// not match the armed tick.
    #[allow(clippy::missing_const_for_fn)]
    pub fn fire(&mut self, now: Tick) -> bool {
        match self.state {
            DeliveryState::Armed { when } if when == now => {
                self.state = DeliveryState::Attempting;
                true
            }
            _ => false,
        }
    }

    /// Consumes a retry signal.
    ///
    /// Returns `false` when no refused delivery is waiting for one.
    pub fn retry(&mut self) -> bool {
        if self.state == DeliveryState::AwaitingRetry {
            self.state = DeliveryState::Attempting;
            true
        } else {
            false
        }
    }

    /// Records that the requester refused the current attempt.
    ///
    /// # Panics
    ///
    /// Panics outside an attempt.
    pub fn park(&mut self) {
        assert_eq!(
            self.state,
            DeliveryState::Attempting,
            "only an in-progress delivery can wait for a retry"
        );
        self.state = DeliveryState::AwaitingRetry;
    }

    /// Returns to idle after the last queued response was delivered.
    ///
    /// # Panics
    ///
    /// Panics outside an attempt.
    pub fn settle(&mut self) {
        assert_eq!(
            self.state,
            DeliveryState::Attempting,
            "only an in-progress delivery can settle"
        );
        self.state = DeliveryState::Idle;
    }
}
