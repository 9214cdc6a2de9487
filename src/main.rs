use anyhow::{Context, Result};
use clap::Parser;
use portprobe::cli::{Args, OutputFormat};
use portprobe::config::{AppSettings, ScanOptions};
use portprobe::output;
use portprobe::scanner::{self, ScanJob, ScanReport, TcpProber};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("portprobe={}", args.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let settings = match &args.config {
        Some(path) => AppSettings::load_from(path)?,
        None => AppSettings::load()?,
    };
    let options = ScanOptions::resolve(&settings, args.overrides())?;
    let plain = args.format == OutputFormat::Plain;

    let (target, ports) = scanner::prepare(&args.target, &options.ports).await?;

    if plain {
        output::print_target(&target)?;
    }

    let started_at = chrono::Utc::now();
    let clock = Instant::now();
    let prober = Arc::new(TcpProber::new(options.timeout));

    let latency = if options.ping_count > 0 {
        let addr = SocketAddr::new(target.ip, options.ping_port);
        let latency = scanner::estimate_latency(prober.as_ref(), addr, options.ping_count).await;
        if plain {
            output::print_ping(latency)?;
        }
        latency
    } else {
        None
    };

    if plain {
        output::print_scan_start(ports.len())?;
    }

    let mut job = ScanJob::new(ports.to_vec()).with_workers(options.threads);
    if !options.grab_banners {
        job = job.without_banners();
    }
    if args.progress {
        job = job.with_progress();
    }

    let results = scanner::run_scan(prober, target.ip, job).await;
    let report = ScanReport::new(
        &target,
        started_at,
        clock.elapsed(),
        ports.len(),
        latency,
        results,
    );

    output::print_results(&report, args.format)?;

    if let Some(path) = &args.output {
        output::save_report(path, target.ip, &report.results)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        if plain {
            output::print_success(&format!("Results saved to {}", path.display()));
        }
    }

    Ok(())
}
