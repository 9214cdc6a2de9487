//! Service names for well-known ports.
//!
//! The table is process-wide, built once on first use and never mutated.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Name reported for ports missing from the table.
pub const UNKNOWN_SERVICE: &str = "Unknown";

static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (21, "FTP"),
        (22, "SSH"),
        (23, "TELNET"),
        (25, "SMTP"),
        (53, "DNS"),
        (80, "HTTP"),
        (110, "POP3"),
        (143, "IMAP"),
        (443, "HTTPS"),
        (3306, "MySQL"),
        (3389, "RDP"),
    ])
});

/// Look up the service name for a port, if it is a well-known one.
pub fn get_service_name(port: u16) -> Option<&'static str> {
    PORT_SERVICES.get(&port).copied()
}

/// Service name for a port, falling back to `"Unknown"`.
pub fn get_service_description(port: u16) -> &'static str {
    get_service_name(port).unwrap_or(UNKNOWN_SERVICE)
}
