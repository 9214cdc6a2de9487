//! Plain-text report files.
//!
//! Layout:
//!
//! ```text
//! Scan results for 10.0.0.5
//!
//! 22 (SSH)
//!   Banner: SSH-2.0-OpenSSH_9.6
//! 80 (HTTP)
//! ```

use crate::scanner::ScanEntry;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::net::IpAddr;
use std::path::Path;

/// Write the report for `ip` to any writer.
pub fn write_report<W: Write>(out: &mut W, ip: IpAddr, entries: &[ScanEntry]) -> io::Result<()> {
    writeln!(out, "Scan results for {}", ip)?;
    writeln!(out)?;

    for entry in entries {
        writeln!(out, "{} ({})", entry.port, entry.service)?;
        if let Some(banner) = entry.visible_banner() {
            writeln!(out, "  Banner: {}", banner)?;
        }
    }

    Ok(())
}

/// Create (or truncate) `path` and write the report into it.
pub fn save_report(path: &Path, ip: IpAddr, entries: &[ScanEntry]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_report(&mut out, ip, entries)?;
    out.flush()?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "report saved");
    Ok(())
}
