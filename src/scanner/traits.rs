//! Prober trait abstraction.
//!
//! The scan coordinator and the latency estimator only talk to a `Prober`,
//! so the real TCP implementation can be swapped for a scripted one.

use crate::banner::BannerRead;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// Result of a single connect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Connection established; carries the time it took.
    Open(Duration),
    /// Refused, timed out, unreachable or any other failure.
    Closed,
}

impl ProbeOutcome {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Connect time in milliseconds, only for open outcomes.
    pub fn elapsed_ms(&self) -> Option<f64> {
        match self {
            Self::Open(elapsed) => Some(duration_ms(*elapsed)),
            Self::Closed => None,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(elapsed) => write!(f, "open ({:.2} ms)", duration_ms(*elapsed)),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Microsecond-resolution milliseconds.
fn duration_ms(elapsed: Duration) -> f64 {
    elapsed.as_micros() as f64 / 1000.0
}

/// An open port found by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// The port number that was scanned.
    pub port: u16,
    /// Well-known service name, or "Unknown".
    pub service: String,
    /// Banner text. `Some("")` when the service sent nothing,
    /// `None` when the banner connection failed or was skipped.
    pub banner: Option<String>,
}

impl ScanEntry {
    pub fn new(port: u16, service: impl Into<String>) -> Self {
        Self {
            port,
            service: service.into(),
            banner: None,
        }
    }

    pub fn with_banner(mut self, banner: Option<String>) -> Self {
        self.banner = banner;
        self
    }

    /// The banner, if one with actual content was captured.
    pub fn visible_banner(&self) -> Option<&str> {
        self.banner.as_deref().filter(|b| !b.is_empty())
    }
}

/// A connection prober.
///
/// Implementations must never fail: every connect error is reported as
/// `ProbeOutcome::Closed` and every banner failure as a `BannerRead` variant.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Attempt one connection and release it immediately.
    async fn probe(&self, addr: SocketAddr) -> ProbeOutcome;

    /// Open a fresh connection and read the service's greeting.
    async fn read_banner(&self, addr: SocketAddr) -> BannerRead;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_elapsed() {
        let open = ProbeOutcome::Open(Duration::from_micros(12_500));
        assert!(open.is_open());
        assert_eq!(open.elapsed_ms(), Some(12.5));
        assert_eq!(ProbeOutcome::Closed.elapsed_ms(), None);
        assert_eq!(open.to_string(), "open (12.50 ms)");
    }

    #[test]
    fn test_visible_banner() {
        let entry = ScanEntry::new(22, "SSH").with_banner(Some(String::new()));
        assert_eq!(entry.visible_banner(), None);

        let entry = entry.with_banner(Some("SSH-2.0-Test".into()));
        assert_eq!(entry.visible_banner(), Some("SSH-2.0-Test"));
    }
}
