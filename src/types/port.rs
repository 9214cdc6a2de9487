//! Port specification parsing and resolution.
//!
//! A `PortSpec` is the parsed form of a string like `"22,80,8000-8010"`.
//! Resolving it yields a `PortSet`: unique ports in ascending order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Error type for port specification parsing. Each variant carries the
/// offending token as written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("invalid port specification token: '{0}'")]
    InvalidFormat(String),
    #[error("port out of valid range (0-65535): '{0}'")]
    OutOfRange(String),
    #[error("invalid port range '{0}': start is greater than end")]
    InvalidRange(String),
    #[error("empty port specification")]
    Empty,
}

/// An inclusive range of ports. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Create a new port range, rejecting `start > end`.
    pub fn new(start: u16, end: u16) -> Result<Self, PortError> {
        if start > end {
            Err(PortError::InvalidRange(format!("{}-{}", start, end)))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    pub const fn start(&self) -> u16 {
        self.start
    }

    pub const fn end(&self) -> u16 {
        self.end
    }

    /// Number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// A valid range always holds at least one port.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = u16> {
        self.start..=self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A parsed port specification, kept in the order it was written.
///
/// Supports formats like:
/// - Single port: "80"
/// - Comma-separated: "80,443,8080"
/// - Range: "1-1000"
/// - Mixed: "22,80,443,8000-9000"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    ranges: Vec<PortRange>,
}

impl PortSpec {
    /// Create an empty port specification.
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    pub fn add_range(&mut self, range: PortRange) {
        self.ranges.push(range);
    }

    pub fn add_port(&mut self, port: u16) {
        self.ranges.push(PortRange::single(port));
    }

    pub fn ranges(&self) -> &[PortRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Collapse the specification into its set of unique ports.
    pub fn resolve(&self) -> PortSet {
        self.ranges.iter().flat_map(|r| r.iter()).collect()
    }
}

impl FromStr for PortSpec {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(PortError::Empty);
        }

        let mut spec = Self::new();

        for part in s.split(',') {
            let part = part.trim();
            match part.split_once('-') {
                Some((lo, hi)) => {
                    if hi.contains('-') {
                        return Err(PortError::InvalidFormat(part.to_string()));
                    }
                    let start = parse_port(lo)?;
                    let end = parse_port(hi)?;
                    if start > end {
                        return Err(PortError::InvalidRange(part.to_string()));
                    }
                    spec.add_range(PortRange { start, end });
                }
                None => spec.add_port(parse_port(part)?),
            }
        }

        Ok(spec)
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Parse one port number, distinguishing garbage from numbers that are
/// simply too large.
fn parse_port(token: &str) -> Result<u16, PortError> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PortError::InvalidFormat(token.to_string()));
    }
    token
        .parse::<u16>()
        .map_err(|_| PortError::OutOfRange(token.to_string()))
}

/// A deduplicated set of ports, iterated in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortSet(BTreeSet<u16>);

impl PortSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, port: u16) -> bool {
        self.0.contains(&port)
    }

    /// Ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u16> {
        self.iter().collect()
    }
}

impl FromIterator<u16> for PortSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse and resolve a port specification in one step.
pub fn resolve_ports(spec: &str) -> Result<PortSet, PortError> {
    spec.parse::<PortSpec>().map(|s| s.resolve())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_list() {
        assert_eq!(resolve_ports("80").unwrap().to_vec(), vec![80]);
        assert_eq!(resolve_ports("80,443").unwrap().to_vec(), vec![80, 443]);
    }

    #[test]
    fn test_range() {
        assert_eq!(resolve_ports("20-22").unwrap().to_vec(), vec![20, 21, 22]);
    }

    #[test]
    fn test_dedup_and_order() {
        assert_eq!(
            resolve_ports("20-22,22,80").unwrap().to_vec(),
            vec![20, 21, 22, 80]
        );
        assert_eq!(
            resolve_ports("443, 80 ,22").unwrap().to_vec(),
            vec![22, 80, 443]
        );
    }

    #[test]
    fn test_idempotent() {
        let spec = "8000-8010,22,80,8005";
        assert_eq!(resolve_ports(spec).unwrap(), resolve_ports(spec).unwrap());
    }

    #[test]
    fn test_bounds() {
        assert!(resolve_ports("0").unwrap().contains(0));
        assert!(resolve_ports("65535").unwrap().contains(65535));
        assert_eq!(resolve_ports("65534-65535").unwrap().len(), 2);
    }

    #[test]
    fn test_reversed_range() {
        assert_eq!(
            resolve_ports("100-50"),
            Err(PortError::InvalidRange("100-50".to_string()))
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            resolve_ports("22,70000"),
            Err(PortError::OutOfRange("70000".to_string()))
        );
        assert!(matches!(
            resolve_ports("1-65536"),
            Err(PortError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(
            resolve_ports("abc"),
            Err(PortError::InvalidFormat("abc".to_string()))
        );
        assert!(matches!(resolve_ports("80,"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(resolve_ports("1-2-3"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(resolve_ports("-5"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(resolve_ports("+5"), Err(PortError::InvalidFormat(_))));
        assert_eq!(resolve_ports("  "), Err(PortError::Empty));
    }

    #[test]
    fn test_spec_display() {
        let spec: PortSpec = "22, 80-82".parse().unwrap();
        assert_eq!(spec.to_string(), "22,80-82");
        assert_eq!(spec.ranges()[1].len(), 3);
    }
}
