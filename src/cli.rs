//! Command-line interface definitions for portprobe.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags left
//! unset fall back to the values in the settings file.

use crate::config::Overrides;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// A concurrent TCP connect port scanner.
#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP port scanner with banner grabbing", long_about = None)]
pub struct Args {
    /// Target IP address or hostname to scan
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan (e.g. "80", "80,443", "1-1000", "22,80,8000-9000") [default: 80]
    #[arg(short, long, value_name = "SPEC")]
    pub ports: Option<String>,

    /// Number of concurrent workers [default: 100]
    #[arg(short = 't', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Connect and banner timeout in seconds, fractions allowed [default: 1.0]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Number of TCP ping attempts, 0 disables [default: 0]
    #[arg(long, value_name = "N")]
    pub ping: Option<u32>,

    /// Port used for the TCP ping [default: 80]
    #[arg(long, value_name = "PORT")]
    pub ping_port: Option<u16>,

    /// Save results to a text report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Console output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Do not read banners from open ports
    #[arg(long)]
    pub no_banner: bool,

    /// Show a progress bar while scanning
    #[arg(long)]
    pub progress: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file instead of the default location
    #[arg(long, value_name = "PATH", env = "PORTPROBE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Per-run overrides for the settings file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            ports: self.ports.clone(),
            threads: self.threads,
            timeout_secs: self.timeout,
            ping_count: self.ping,
            ping_port: self.ping_port,
            no_banner: self.no_banner,
        }
    }

    /// Default log filter derived from `-v`/`-q`.
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}
