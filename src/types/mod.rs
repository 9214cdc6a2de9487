//! Core type definitions: port specifications and resolved targets.

mod port;
mod target;

pub use port::{resolve_ports, PortError, PortRange, PortSet, PortSpec};
pub use target::{ScanTarget, TargetError};
