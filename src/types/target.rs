//! Target resolution.
//!
//! A scan runs against exactly one address. The host string is resolved
//! once up front and the resulting `ScanTarget` is never re-resolved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl ScanTarget {
    pub fn new(original: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            original: original.into(),
            ip,
        }
    }

    /// Resolve a host string to a single target.
    ///
    /// IP literals are used as-is. Hostnames go through DNS; when several
    /// addresses come back, the first IPv4 address is preferred.
    pub async fn resolve(host: &str) -> Result<Self, TargetError> {
        let host = host.trim();

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(Self::new(host, ip));
        }

        if !is_valid_hostname(host) {
            return Err(TargetError::InvalidFormat(host.to_string()));
        }

        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

        let response = resolver
            .lookup_ip(host)
            .await
            .map_err(|e| TargetError::DnsResolutionFailed(host.to_string(), e.to_string()))?;

        let ips: Vec<IpAddr> = response.iter().collect();
        let ip = ips
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| ips.first())
            .copied()
            .ok_or_else(|| TargetError::NoAddressesFound(host.to_string()))?;

        tracing::debug!(host, %ip, candidates = ips.len(), "resolved target");
        Ok(Self::new(host, ip))
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// Error type for target resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target format: '{0}'")]
    InvalidFormat(String),
    #[error("failed to resolve hostname '{0}': {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),
}

/// Check if a string is a syntactically valid hostname.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    for label in s.split('.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if !label.chars().next().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }
        if !label.chars().last().is_some_and(|c| c.is_alphanumeric()) {
            return false;
        }
        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return false;
        }
    }

    true
}
