//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write one `port,service,banner` row per open port.
pub fn write_csv<W: Write>(out: W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["port", "service", "banner"])?;

    for entry in &report.results {
        let port = entry.port.to_string();
        wtr.write_record([
            port.as_str(),
            entry.service.as_str(),
            entry.banner.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Print results in CSV format.
pub fn print_csv(report: &ScanReport) -> io::Result<()> {
    write_csv(io::stdout().lock(), report)
}
