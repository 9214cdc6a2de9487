//! JSON output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write the report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

/// Print results in JSON format.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    write_json(&mut io::stdout().lock(), report)
}
