//! Validated runtime options for a scan.

use super::settings::AppSettings;
use crate::error::{ConfigError, ConfigResult};
use std::time::Duration;

/// Options for a single run after merging CLI flags over settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    pub ports: String,
    pub threads: usize,
    pub timeout: Duration,
    pub ping_count: u32,
    pub ping_port: u16,
    pub grab_banners: bool,
}

/// Per-run overrides; `None` keeps the settings value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ports: Option<String>,
    pub threads: Option<usize>,
    pub timeout_secs: Option<f64>,
    pub ping_count: Option<u32>,
    pub ping_port: Option<u16>,
    pub no_banner: bool,
}

impl ScanOptions {
    /// Merge overrides over settings and validate the result.
    pub fn resolve(settings: &AppSettings, overrides: Overrides) -> ConfigResult<Self> {
        let threads = overrides.threads.unwrap_or(settings.default_threads);
        if threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }

        let timeout_secs = overrides
            .timeout_secs
            .unwrap_or(settings.default_timeout_secs);

        Ok(Self {
            ports: overrides
                .ports
                .unwrap_or_else(|| settings.default_ports.clone()),
            threads,
            timeout: timeout_from_secs(timeout_secs)?,
            ping_count: overrides.ping_count.unwrap_or(settings.default_ping_count),
            ping_port: overrides.ping_port.unwrap_or(settings.ping_port),
            grab_banners: settings.grab_banners && !overrides.no_banner,
        })
    }
}

/// Convert fractional seconds into a timeout, rejecting zero, negative
/// and non-finite values.
pub fn timeout_from_secs(secs: f64) -> ConfigResult<Duration> {
    if secs.is_nan() || secs <= 0.0 {
        return Err(ConfigError::InvalidTimeout(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeout(secs))
}
