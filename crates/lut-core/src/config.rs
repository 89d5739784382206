//! Construction parameters for a lookup device.

use crate::api::Tick;
use crate::memory::default_window;
use crate::{AddrRange, ConfigError, LookupEntry, LookupTable, DEFAULT_ENTRIES};

/// Default per-access latency in scheduler ticks.
pub const DEFAULT_LATENCY_TICKS: Tick = 1;

/// Default device name used in logs and range announcements.
pub const DEFAULT_DEVICE_NAME: &str = "lut";

/// Top-level immutable configuration for a device instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct LutConfig {
    /// Instance name; the port is named `<name>.port`.
    pub name: String,
    /// Fixed per-access latency in ticks, for atomic and timing accesses.
    pub latency: Tick,
    /// Address window the device claims.
    pub addr_range: AddrRange,
    /// Table contents, loaded once at construction.
    pub entries: Vec<LookupEntry>,
}

impl Default for LutConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DEVICE_NAME.to_owned(),
            latency: DEFAULT_LATENCY_TICKS,
            addr_range: default_window(),
            entries: DEFAULT_ENTRIES.to_vec(),
        }
    }
}

impl LutConfig {
    /// Returns a copy with a different latency.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn with_latency(mut self, latency: Tick) -> Self {
        self.latency = latency;
        self
    }

    /// Returns a copy mapped at a different window.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn with_addr_range(mut self, addr_range: AddrRange) -> Self {
        self.addr_range = addr_range;
        self
    }

    /// Returns a copy with different table contents.
    #[must_use]
    pub fn with_entries(mut self, entries: Vec<LookupEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Checks every parameter and builds the table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyName`] for an empty name,
    /// [`ConfigError::InvalidRange`] for an inverted window, and
    /// [`ConfigError::DuplicateKey`] for repeated table keys.
    pub fn build_table(&self) -> Result<LookupTable, ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        self.addr_range.validate()?;
        LookupTable::from_entries(self.entries.iter().copied())
    }

    /// Table keys that no address inside the window can reach.
    #[must_use]
    pub fn unreachable_keys(&self) -> Vec<u32> {
        let window = self.addr_range.size();
        self.entries
            .iter()
            .map(|entry| entry.key)
            .filter(|&key| u64::from(key) >= window)
            .collect()
    }
}
