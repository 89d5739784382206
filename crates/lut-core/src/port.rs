//! Addressable boundary of the device toward the routing fabric.

use crate::api::RangeChangeListener;
use crate::AddrRange;

/// Response port exposing the device window.
///
/// The fabric must not route accesses here before the range is marked valid
/// and announced; that ordering is owned by the fabric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePort {
    name: String,
    range: AddrRange,
    range_valid: bool,
}

impl ResponsePort {
    /// Creates the port of device `owner`, named `<owner>.port`.
    #[must_use]
    pub fn new(owner: &str, range: AddrRange) -> Self {
        Self {
            name: format!("{owner}.port"),
            range,
            range_valid: false,
        }
    }

    /// Port name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The single window this port serves.
    #[must_use]
    pub const fn range(&self) -> AddrRange {
        self.range
    }

    /// Ranges reported to the fabric; always exactly one.
    #[must_use]
    pub fn addr_ranges(&self) -> Vec<AddrRange> {
        vec![self.range]
    }

    /// Returns `true` once the port has been told its range is ready.
    #[must_use]
    pub const fn is_range_valid(&self) -> bool {
        self.range_valid
    }

    /// Marks the range ready for routing.
    #[allow(clippy::missing_const_for_fn)]
    pub fn set_range_valid(&mut self) {
        self.range_valid = true;
    }

    /// Announces the served ranges to the fabric.
    pub fn send_range_change<L>(&self, listener: &mut L)
    where
        L: RangeChangeListener + ?Sized,
    {
        listener.recv_range_change(&self.name, &self.addr_ranges());
    }
}
