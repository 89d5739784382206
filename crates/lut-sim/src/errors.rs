//! Error types for loading and running scenarios.

use std::path::PathBuf;

use lut_core::{ConfigError, MAX_ACCESS_BYTES};
use thiserror::Error;

/// Failures surfaced by the driver and CLI.
#[derive(Debug, Error)]
pub enum SimError {
    /// Scenario file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Scenario file was not valid scenario JSON.
    #[error("invalid scenario {}: {source}", path.display())]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// Report could not be serialized.
    #[error("failed to encode report: {0}")]
    Encode(#[source] serde_json::Error),
    /// A scenario request is wider than the device's lookup value.
    #[error(
        "request {index} accesses {size} bytes, more than the {max}-byte lookup value",
        max = MAX_ACCESS_BYTES
    )]
    InvalidRequest {
        /// Position of the request in the scenario.
        index: usize,
        /// Requested access width in bytes.
        size: u32,
    },
    /// Device parameters were rejected.
    #[error("invalid device configuration: {0}")]
    Config(#[from] ConfigError),
}
