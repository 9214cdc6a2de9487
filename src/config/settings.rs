//! Application settings and paths.
//!
//! Settings live in an XDG-compliant config directory as JSON. Every field
//! is optional in the file; missing fields fall back to built-in defaults.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portprobe)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform configuration directory.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portprobe", "portprobe")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// User-tunable defaults for a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Port specification used when `--ports` is not given.
    pub default_ports: String,
    /// Number of concurrent workers.
    pub default_threads: usize,
    /// Connect and banner-read timeout in seconds.
    pub default_timeout_secs: f64,
    /// TCP ping attempts, 0 disables the ping.
    pub default_ping_count: u32,
    /// Port the TCP ping connects to.
    pub ping_port: u16,
    /// Read a banner from every open port.
    pub grab_banners: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_ports: "80".to_string(),
            default_threads: 100,
            default_timeout_secs: 1.0,
            default_ping_count: 0,
            ping_port: 80,
            grab_banners: true,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, or defaults if none exist.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();

        if !file.exists() {
            tracing::debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Save settings to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
