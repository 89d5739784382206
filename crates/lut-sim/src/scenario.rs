//! Scenario description: device parameters, access mode and request stream.

use std::fs;
use std::path::Path;

use lut_core::{AccessMode, LutConfig, Packet, Tick, DEFAULT_ENTRIES, MAX_ACCESS_BYTES};
use serde::{Deserialize, Serialize};

use crate::errors::SimError;
use crate::requester::Backpressure;

/// Number of lookups in the reference harness's batch phase.
pub const REFERENCE_BATCH_LOOKUPS: usize = 100;

/// Kind of access a scenario request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Read the value stored at the offset's key.
    #[default]
    Read,
    /// Write a value; the device accepts and discards it.
    Write,
}

/// One request in a scenario, addressed relative to the device window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestSpec {
    /// Byte offset into the device window; equals the lookup key.
    pub offset: u64,
    /// Read or write.
    #[serde(default)]
    pub kind: RequestKind,
    /// Access width in bytes.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Value carried by writes.
    #[serde(default)]
    pub value: u32,
}

const fn default_size() -> u32 {
    MAX_ACCESS_BYTES
}

impl RequestSpec {
    /// Full-width read at `offset`.
    #[must_use]
    pub const fn read(offset: u64) -> Self {
        Self {
            offset,
            kind: RequestKind::Read,
            size: MAX_ACCESS_BYTES,
            value: 0,
        }
    }

    /// Full-width write of `value` at `offset`.
    #[must_use]
    pub const fn write(offset: u64, value: u32) -> Self {
        Self {
            offset,
            kind: RequestKind::Write,
            size: MAX_ACCESS_BYTES,
            value,
        }
    }

    /// Builds the packet for this request against window base `base`.
    #[must_use]
    pub fn packet(&self, base: u64, tag: u64) -> Packet {
        let addr = base.wrapping_add(self.offset);
        match self.kind {
            RequestKind::Read => Packet::read(addr, self.size),
            RequestKind::Write => Packet::write(addr, self.size, self.value),
        }
        .with_tag(tag)
    }
}

/// Complete driver input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Device construction parameters.
    pub device: LutConfig,
    /// Access path used for every request.
    pub mode: AccessMode,
    /// Requests in issue order.
    pub requests: Vec<RequestSpec>,
    /// Ticks between consecutive timing-mode issues; 0 issues back-to-back.
    pub issue_interval: Tick,
    /// Requester push-back applied to timing responses.
    pub backpressure: Backpressure,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::reference_harness(AccessMode::Timing)
    }
}

impl Scenario {
    /// The reference probe program: one read per built-in key, then a batch
    /// of [`REFERENCE_BATCH_LOOKUPS`] reads cycling through the same keys.
    #[must_use]
    pub fn reference_harness(mode: AccessMode) -> Self {
        let probes: Vec<_> = DEFAULT_ENTRIES
            .iter()
            .map(|entry| RequestSpec::read(u64::from(entry.key)))
            .collect();
        let batch = probes.iter().copied().cycle().take(REFERENCE_BATCH_LOOKUPS);
        let requests = probes.iter().copied().chain(batch).collect();

        Self {
            device: LutConfig::default(),
            mode,
            requests,
            issue_interval: 0,
            backpressure: Backpressure::none(),
        }
    }

    /// Checks every request against the device's access width.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidRequest`] for the first request wider than
    /// [`MAX_ACCESS_BYTES`].
    pub fn validate(&self) -> Result<(), SimError> {
        match self
            .requests
            .iter()
            .position(|request| request.size > MAX_ACCESS_BYTES)
        {
            Some(index) => Err(SimError::InvalidRequest {
                index,
                size: self.requests[index].size,
            }),
            None => Ok(()),
        }
    }

    /// Parses and validates a scenario from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Json`] when the text is not a valid scenario and
    /// [`SimError::InvalidRequest`] when a request is too wide.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self, SimError> {
        let scenario: Self = serde_json::from_str(text).map_err(|source| SimError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Loads a scenario file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] when the file cannot be read and
    /// [`SimError::Json`] when it does not parse.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }
}
