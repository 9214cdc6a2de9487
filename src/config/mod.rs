//! Configuration management for portprobe.
//!
//! Persisted defaults live in an XDG-compliant settings file; `ScanOptions`
//! is the validated view a single run works from.

mod options;
mod settings;

pub use options::{timeout_from_secs, Overrides, ScanOptions};
pub use settings::{AppSettings, Paths};
