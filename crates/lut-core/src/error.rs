use thiserror::Error;

/// Construction-time failures for a lookup device and its parameters.
///
/// Runtime access paths never return these: a lookup miss degrades to a zero
/// payload and oversized accesses are caller contract breaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// Address window whose start lies above its end.
    #[error("address range start {start:#x} exceeds end {end:#x}")]
    InvalidRange {
        /// Requested inclusive start address.
        start: u64,
        /// Requested exclusive end address.
        end: u64,
    },
    /// Address window whose `start + size` does not fit in 64 bits.
    #[error("address range at {start:#x} with size {size:#x} overflows the address space")]
    RangeOverflow {
        /// Requested start address.
        start: u64,
        /// Requested window size in bytes.
        size: u64,
    },
    /// Table contents listed the same key more than once.
    #[error("lookup table key {key:#x} is defined more than once")]
    DuplicateKey {
        /// Key that appeared twice.
        key: u32,
    },
    /// Device name was empty.
    #[error("device name must not be empty")]
    EmptyName,
}
