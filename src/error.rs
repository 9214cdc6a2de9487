//! Error types for portprobe.
//!
//! Uses `thiserror` for ergonomic error definitions. Only target resolution,
//! port specification, configuration and report-write failures ever surface
//! as errors; per-port connect and banner failures are absorbed by the scanner.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::types::{PortError, TargetError};

/// Fatal errors of a scan run.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Resolution(#[from] TargetError),

    #[error(transparent)]
    InvalidSpec(#[from] PortError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),

    #[error("invalid timeout: {0} (must be a positive number of seconds)")]
    InvalidTimeout(f64),

    #[error("thread count must be at least 1")]
    ZeroThreads,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

/// Result type alias for scan runs.
pub type ScanResult<T> = Result<T, ScanError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
