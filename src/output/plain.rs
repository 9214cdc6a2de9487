//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::ScanReport;
use crate::types::ScanTarget;
use console::style;
use std::io::{self, Write};

/// Print results in human-readable plain text format.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "{} {}", style("[+]").green().bold(), style("Open Ports:").bold())?;

    if report.results.is_empty() {
        writeln!(out, "    {}", style("none").dim())?;
    }

    for entry in &report.results {
        writeln!(
            out,
            "{} ({})",
            style(entry.port).green().bold(),
            entry.service
        )?;
        if let Some(banner) = entry.visible_banner() {
            writeln!(out, "   {} {}", style("Banner:").dim(), banner)?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} {} of {} ports open, scanned in {:.2}s",
        style("[+]").green().bold(),
        style(report.open_ports).green().bold(),
        report.ports_scanned,
        report.duration_ms as f64 / 1000.0
    )?;

    Ok(())
}

/// Write the resolved target line.
pub fn write_target<W: Write>(out: &mut W, target: &ScanTarget) -> io::Result<()> {
    writeln!(
        out,
        "{} Target: {} ({})",
        style("[+]").green().bold(),
        style(&target.original).white().bold(),
        target.ip
    )
}

/// Write the outcome of the TCP ping.
pub fn write_ping<W: Write>(out: &mut W, latency_ms: Option<f64>) -> io::Result<()> {
    match latency_ms {
        Some(ms) => writeln!(out, "{} TCP Ping: {:.2} ms", style("[+]").green().bold(), ms),
        None => writeln!(out, "{} Ping failed", style("[!]").yellow().bold()),
    }
}

/// Write the line announcing how many ports are about to be scanned.
pub fn write_scan_start<W: Write>(out: &mut W, ports: usize) -> io::Result<()> {
    writeln!(
        out,
        "{} Scanning {} ports...",
        style("[+]").green().bold(),
        style(ports).white().bold()
    )
}

pub fn print_target(target: &ScanTarget) -> io::Result<()> {
    write_target(&mut io::stdout().lock(), target)
}

pub fn print_ping(latency_ms: Option<f64>) -> io::Result<()> {
    write_ping(&mut io::stdout().lock(), latency_ms)
}

pub fn print_scan_start(ports: usize) -> io::Result<()> {
    write_scan_start(&mut io::stdout().lock(), ports)
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("[!]").red().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("[+]").green().bold(), msg);
}
