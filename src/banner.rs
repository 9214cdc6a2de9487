//! Banner grabbing for open TCP ports.
//!
//! A banner grab opens its own connection, sends nothing, and performs one
//! bounded read. Services that wait for the client to speak first simply
//! yield an empty banner.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Maximum bytes to read for a banner.
pub const MAX_BANNER_SIZE: usize = 1024;

/// Outcome of a banner grab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerRead {
    /// The service sent decodable, non-blank text.
    Captured(String),
    /// Connected, but nothing usable arrived before the timeout.
    Empty,
    /// The banner connection could not be established.
    ConnectFailed,
}

impl BannerRead {
    /// Collapse into the optional banner stored on a scan entry:
    /// an empty read is `Some("")`, a failed connect is `None`.
    pub fn into_banner(self) -> Option<String> {
        match self {
            Self::Captured(text) => Some(text),
            Self::Empty => Some(String::new()),
            Self::ConnectFailed => None,
        }
    }
}

/// Connect to `addr` and read whatever the service volunteers.
///
/// The connect and the read are each bounded by `limit`.
pub async fn grab_banner(addr: SocketAddr, limit: Duration) -> BannerRead {
    let stream = match timeout(limit, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            tracing::trace!(%addr, error = %e, "banner connect failed");
            return BannerRead::ConnectFailed;
        }
        Err(_) => {
            tracing::trace!(%addr, "banner connect timed out");
            return BannerRead::ConnectFailed;
        }
    };

    grab_banner_from_stream(stream, limit).await
}

/// Read a banner from an already connected stream. The stream is dropped
/// before returning.
pub async fn grab_banner_from_stream(mut stream: TcpStream, limit: Duration) -> BannerRead {
    let mut buffer = vec![0u8; MAX_BANNER_SIZE];

    match timeout(limit, stream.read(&mut buffer)).await {
        Ok(Ok(n)) => decode_banner(&buffer[..n]),
        Ok(Err(e)) => {
            tracing::trace!(error = %e, "banner read failed");
            BannerRead::Empty
        }
        Err(_) => BannerRead::Empty,
    }
}

/// Decode raw banner bytes as UTF-8 and trim surrounding whitespace.
pub fn decode_banner(data: &[u8]) -> BannerRead {
    match std::str::from_utf8(data) {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                BannerRead::Empty
            } else {
                BannerRead::Captured(text.to_string())
            }
        }
        Err(_) => BannerRead::Empty,
    }
}
