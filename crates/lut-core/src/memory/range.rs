//! Contiguous address window claimed by a device.

use crate::ConfigError;

/// Half-open address window `[start, end)` owned by exactly one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AddrRange {
    /// Inclusive start address.
    pub start: u64,
    /// Exclusive end address.
    pub end: u64,
}

impl AddrRange {
    /// Creates a window from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRange`] when `start > end`.
    pub const fn new(start: u64, end: u64) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a window of `size` bytes beginning at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RangeOverflow`] when the end address does not
    /// fit in 64 bits.
    pub const fn with_size(start: u64, size: u64) -> Result<Self, ConfigError> {
        match start.checked_add(size) {
            Some(end) => Ok(Self { start, end }),
            None => Err(ConfigError::RangeOverflow { start, size }),
        }
    }

    /// Re-checks the ordering invariant, for windows built field-by-field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRange`] when `start > end`.
    pub const fn validate(self) -> Result<Self, ConfigError> {
        Self::new(self.start, self.end)
    }

    /// Window length in bytes.
    #[must_use]
    pub const fn size(self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` when the window covers no addresses.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` when `addr` falls inside the window.
    #[must_use]
    pub const fn contains(self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }

    /// Byte offset of `addr` from the window start.
    ///
    /// Routing is owned by the surrounding fabric, so an address below the
    /// window wraps rather than faulting.
    #[must_use]
    pub const fn offset_of(self, addr: u64) -> u64 {
        addr.wrapping_sub(self.start)
    }
}

impl std::fmt::Display for AddrRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:#x}:{:#x}]", self.start, self.end)
    }
}
