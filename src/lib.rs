//! # portprobe - a concurrent TCP port scanner
//!
//! portprobe resolves a single target host, probes a set of ports with full
//! TCP connects over a bounded pool of async workers, reads the greeting
//! banner of each open port, and can estimate connect latency with a
//! sequential TCP ping.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portprobe::scanner;
//! use portprobe::types::{resolve_ports, ScanTarget};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let target = ScanTarget::resolve("192.168.1.1").await?;
//!     let ports = resolve_ports("22,80,8000-8100")?;
//!
//!     let open = scanner::scan(target.ip, &ports.to_vec(), Duration::from_secs(1), 100).await;
//!     for entry in open {
//!         println!("{} ({})", entry.port, entry.service);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Port specifications and resolved targets
//! - [`scanner`] - Probing, banner reads, TCP ping and the scan coordinator
//! - [`banner`] - Passive banner grabbing
//! - [`services`] - Well-known port names
//! - [`config`] - Settings file and validated run options
//! - [`output`] - Console formats and the text report
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use banner::BannerRead;
pub use error::{ConfigError, ScanError};
pub use scanner::{ProbeOutcome, Prober, ScanEntry, ScanJob, ScanReport, TcpProber};
pub use types::{resolve_ports, PortError, PortSet, PortSpec, ScanTarget, TargetError};
