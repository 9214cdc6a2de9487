//! Scanner module - the concurrent scan engine.
//!
//! Ports are fanned out over a bounded pool of tokio tasks. Each task owns
//! its own sockets, probes one port, grabs a banner when the port is open,
//! and hands its entry back to the coordinator, which merges and sorts.

pub mod latency;
pub mod tcp;
pub mod traits;

use crate::error::ScanResult;
use crate::services::get_service_description;
use crate::types::{resolve_ports, PortSet, ScanTarget};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

pub use latency::{estimate_latency, mean_latency};
pub use tcp::TcpProber;
pub use traits::{ProbeOutcome, Prober, ScanEntry};

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: usize = 100;

/// Parameters for one scan pass over a single target.
#[derive(Debug, Clone)]
pub struct ScanJob {
    /// Ports to probe, in any order.
    pub ports: Vec<u16>,
    /// Maximum number of ports probed at once.
    pub workers: usize,
    /// Whether to read a banner from each open port.
    pub grab_banners: bool,
    /// Whether to draw a progress bar on stderr.
    pub show_progress: bool,
}

impl ScanJob {
    pub fn new(ports: Vec<u16>) -> Self {
        Self {
            ports,
            workers: DEFAULT_WORKERS,
            grab_banners: true,
            show_progress: false,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn without_banners(mut self) -> Self {
        self.grab_banners = false;
        self
    }

    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }
}

/// Complete results of a scan run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub target: String,
    pub ip_address: IpAddr,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub ports_scanned: usize,
    pub open_ports: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    pub results: Vec<ScanEntry>,
}

impl ScanReport {
    pub fn new(
        target: &ScanTarget,
        started_at: DateTime<Utc>,
        duration: Duration,
        ports_scanned: usize,
        latency_ms: Option<f64>,
        results: Vec<ScanEntry>,
    ) -> Self {
        Self {
            target: target.original.clone(),
            ip_address: target.ip,
            started_at,
            duration_ms: duration.as_millis() as u64,
            ports_scanned,
            open_ports: results.len(),
            latency_ms,
            results,
        }
    }
}

/// Resolve the target host and the port specification for a run.
///
/// Either failure is fatal and happens before any probe is sent.
pub async fn prepare(host: &str, port_spec: &str) -> ScanResult<(ScanTarget, PortSet)> {
    let target = ScanTarget::resolve(host).await?;
    let ports = resolve_ports(port_spec)?;
    Ok((target, ports))
}

/// Scan `ports` on `ip` over real TCP with `workers` concurrent probes.
///
/// Returns one entry per open port, ascending by port.
pub async fn scan(ip: IpAddr, ports: &[u16], timeout: Duration, workers: usize) -> Vec<ScanEntry> {
    let prober = Arc::new(TcpProber::new(timeout));
    run_scan(prober, ip, ScanJob::new(ports.to_vec()).with_workers(workers)).await
}

/// Execute a scan job with the given prober.
///
/// At most `job.workers` ports are in flight at any time; a worker count of
/// zero is treated as one. Per-port failures, including a panicking task,
/// only drop that port from the results.
pub async fn run_scan<P>(prober: Arc<P>, ip: IpAddr, job: ScanJob) -> Vec<ScanEntry>
where
    P: Prober + 'static,
{
    let total = job.ports.len();
    let workers = job.workers.clamp(1, Semaphore::MAX_PERMITS);
    let semaphore = Arc::new(Semaphore::new(workers));
    let progress = job.show_progress.then(|| progress_bar(total as u64));
    let grab_banners = job.grab_banners;

    tracing::debug!(%ip, ports = total, workers, grab_banners, "starting scan");

    let mut tasks = JoinSet::new();
    let mut entries = Vec::new();

    for port in job.ports {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };
        let prober = Arc::clone(&prober);

        tasks.spawn(async move {
            let _permit = permit;
            scan_port(prober.as_ref(), SocketAddr::new(ip, port), grab_banners).await
        });

        while let Some(joined) = tasks.try_join_next() {
            collect(joined, &mut entries, progress.as_ref());
        }
    }

    while let Some(joined) = tasks.join_next().await {
        collect(joined, &mut entries, progress.as_ref());
    }

    if let Some(pb) = progress {
        pb.finish_with_message("Scan complete");
    }

    entries.sort_by_key(|e| e.port);
    tracing::debug!(%ip, open = entries.len(), "scan finished");
    entries
}

/// Probe a single port and build its entry if it is open.
pub async fn scan_port<P>(prober: &P, addr: SocketAddr, grab_banners: bool) -> Option<ScanEntry>
where
    P: Prober + ?Sized,
{
    if !prober.probe(addr).await.is_open() {
        return None;
    }

    let port = addr.port();
    let banner = if grab_banners {
        prober.read_banner(addr).await.into_banner()
    } else {
        None
    };

    tracing::debug!(port, "open");
    Some(ScanEntry::new(port, get_service_description(port)).with_banner(banner))
}

fn collect(
    joined: Result<Option<ScanEntry>, JoinError>,
    entries: &mut Vec<ScanEntry>,
    progress: Option<&ProgressBar>,
) {
    match joined {
        Ok(Some(entry)) => {
            if let Some(pb) = progress {
                pb.set_message(format!("Found open port: {}", entry.port));
            }
            entries.push(entry);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "port task failed"),
    }

    if let Some(pb) = progress {
        pb.inc(1);
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::BannerRead;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    /// Treats a fixed set of ports as open and tracks concurrency.
    #[derive(Default)]
    struct FakeProber {
        open: HashMap<u16, BannerRead>,
        panic_on: Option<u16>,
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FakeProber {
        fn with_open(ports: &[(u16, BannerRead)]) -> Self {
            Self {
                open: ports.iter().cloned().collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, addr: SocketAddr) -> ProbeOutcome {
            if self.panic_on == Some(addr.port()) {
                panic!("probe blew up");
            }
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.open.contains_key(&addr.port()) {
                ProbeOutcome::Open(Duration::from_millis(1))
            } else {
                ProbeOutcome::Closed
            }
        }

        async fn read_banner(&self, addr: SocketAddr) -> BannerRead {
            self.open
                .get(&addr.port())
                .cloned()
                .unwrap_or(BannerRead::ConnectFailed)
        }
    }

    #[tokio::test]
    async fn test_results_sorted_and_closed_dropped() {
        let prober = Arc::new(FakeProber::with_open(&[
            (80, BannerRead::Empty),
            (22, BannerRead::Captured("SSH-2.0-Test".into())),
        ]));

        let entries = run_scan(prober, LOCALHOST, ScanJob::new(vec![443, 80, 22])).await;

        assert_eq!(
            entries,
            vec![
                ScanEntry::new(22, "SSH").with_banner(Some("SSH-2.0-Test".into())),
                ScanEntry::new(80, "HTTP").with_banner(Some(String::new())),
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_service_and_failed_banner() {
        let prober = Arc::new(FakeProber::with_open(&[(9999, BannerRead::ConnectFailed)]));

        let entries = run_scan(prober, LOCALHOST, ScanJob::new(vec![9999])).await;
        assert_eq!(entries, vec![ScanEntry::new(9999, "Unknown")]);
    }

    #[tokio::test]
    async fn test_banners_can_be_skipped() {
        let prober = Arc::new(FakeProber::with_open(&[(21, BannerRead::Captured("220".into()))]));
        let job = ScanJob::new(vec![21]).without_banners();

        let entries = run_scan(prober, LOCALHOST, job).await;
        assert_eq!(entries, vec![ScanEntry::new(21, "FTP")]);
    }

    #[tokio::test]
    async fn test_worker_count_does_not_change_results() {
        let open: Vec<(u16, BannerRead)> = (1000..1200)
            .filter(|p| p % 7 == 0)
            .map(|p| (p, BannerRead::Empty))
            .collect();
        let ports: Vec<u16> = (1000..1200).rev().collect();

        let narrow = run_scan(
            Arc::new(FakeProber::with_open(&open)),
            LOCALHOST,
            ScanJob::new(ports.clone()).with_workers(3),
        )
        .await;
        let wide = run_scan(
            Arc::new(FakeProber::with_open(&open)),
            LOCALHOST,
            ScanJob::new(ports.clone()).with_workers(1000),
        )
        .await;
        let zero = run_scan(
            Arc::new(FakeProber::with_open(&open)),
            LOCALHOST,
            ScanJob::new(ports).with_workers(0),
        )
        .await;

        assert_eq!(narrow.len(), open.len());
        assert_eq!(narrow, wide);
        assert_eq!(narrow, zero);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let prober = Arc::new(FakeProber {
            delay: Duration::from_millis(10),
            ..FakeProber::default()
        });

        run_scan(
            Arc::clone(&prober),
            LOCALHOST,
            ScanJob::new((1..=40).collect()).with_workers(4),
        )
        .await;

        let peak = prober.peak.load(Ordering::SeqCst);
        assert!(peak <= 4, "peak concurrency was {peak}");
        assert!(peak >= 2);
    }

    #[tokio::test]
    async fn test_panicking_port_does_not_abort_scan() {
        let mut prober = FakeProber::with_open(&[(80, BannerRead::Empty), (443, BannerRead::Empty)]);
        prober.panic_on = Some(443);

        let entries = run_scan(Arc::new(prober), LOCALHOST, ScanJob::new(vec![443, 80, 22])).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].port, 80);
    }

    #[tokio::test]
    async fn test_scan_real_listeners() {
        let greeter = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let greeter_port = greeter.local_addr().unwrap().port();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = greeter.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let _ = socket.write_all(b"hello there\n").await;
                    tokio::time::sleep(Duration::from_millis(500)).await;
                });
            }
        });

        let silent = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let silent_port = silent.local_addr().unwrap().port();

        let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let closed_port = closed.local_addr().unwrap().port();
        drop(closed);

        let entries = scan(
            LOCALHOST,
            &[closed_port, silent_port, greeter_port],
            Duration::from_millis(300),
            2,
        )
        .await;

        let mut expected = vec![
            ScanEntry::new(greeter_port, "Unknown").with_banner(Some("hello there".into())),
            ScanEntry::new(silent_port, "Unknown").with_banner(Some(String::new())),
        ];
        expected.sort_by_key(|e| e.port);
        assert_eq!(entries, expected);
        drop(silent);
    }

    #[tokio::test]
    async fn test_prepare_rejects_bad_input() {
        let (target, ports) = prepare("127.0.0.1", "22,80").await.unwrap();
        assert_eq!(target.ip, LOCALHOST);
        assert_eq!(ports.to_vec(), vec![22, 80]);

        assert!(matches!(
            prepare("127.0.0.1", "80-20").await,
            Err(crate::error::ScanError::InvalidSpec(_))
        ));
        assert!(matches!(
            prepare("not a host", "80").await,
            Err(crate::error::ScanError::Resolution(_))
        ));
    }

    #[test]
    fn test_report_counts_open_ports() {
        let target = ScanTarget::new("localhost", LOCALHOST);
        let report = ScanReport::new(
            &target,
            Utc::now(),
            Duration::from_millis(1500),
            10,
            Some(0.42),
            vec![ScanEntry::new(22, "SSH")],
        );
        assert_eq!(report.open_ports, 1);
        assert_eq!(report.duration_ms, 1500);
        assert_eq!(report.target, "localhost");
    }
}
