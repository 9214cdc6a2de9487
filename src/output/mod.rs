//! Output formatting module.
//!
//! Console renderers (plain, JSON, CSV) and the plain-text report file.

mod csv_format;
mod json_format;
mod plain;
mod report;

pub use csv_format::{print_csv, write_csv};
pub use json_format::{print_json, write_json};
pub use plain::{
    print_error, print_ping, print_plain, print_scan_start, print_success, print_target,
    write_ping, write_scan_start, write_target,
};
pub use report::{save_report, write_report};

use crate::cli::OutputFormat;
use crate::scanner::ScanReport;
use std::io;

/// Format and print scan results according to the specified format.
pub fn print_results(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => plain::print_plain(report),
        OutputFormat::Json => json_format::print_json(report),
        OutputFormat::Csv => csv_format::print_csv(report),
    }
}
