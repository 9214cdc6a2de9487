//! TCP connect prober.
//!
//! Performs full TCP connects using the operating system's socket API.
//! No special privileges are required.

use crate::banner::{grab_banner, BannerRead};
use crate::scanner::traits::{ProbeOutcome, Prober};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Prober backed by real TCP connections.
#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    /// Create a prober whose connects and banner reads are each bounded
    /// by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: SocketAddr) -> ProbeOutcome {
        let start = Instant::now();

        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                let elapsed = start.elapsed();
                drop(stream);
                ProbeOutcome::Open(elapsed)
            }
            Ok(Err(e)) => {
                tracing::trace!(%addr, error = %e, "connect failed");
                ProbeOutcome::Closed
            }
            Err(_) => {
                tracing::trace!(%addr, "connect timed out");
                ProbeOutcome::Closed
            }
        }
    }

    async fn read_banner(&self, addr: SocketAddr) -> BannerRead {
        grab_banner(addr, self.timeout).await
    }
}
