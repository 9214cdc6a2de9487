//! TCP ping: connect latency measured over repeated attempts.
//!
//! Attempts run strictly one after another. Running them concurrently
//! would measure queueing on the local host rather than path latency.

use crate::scanner::traits::Prober;
use std::net::SocketAddr;

/// Probe `addr` `attempts` times and return the mean connect time of the
/// successful attempts in milliseconds, rounded to two decimals.
///
/// Failed attempts are left out of the sample entirely. Returns `None` when
/// no attempt succeeded or `attempts` is zero.
pub async fn estimate_latency<P>(prober: &P, addr: SocketAddr, attempts: u32) -> Option<f64>
where
    P: Prober + ?Sized,
{
    let mut total_ms = 0.0;
    let mut succeeded: u32 = 0;

    for attempt in 1..=attempts {
        let outcome = prober.probe(addr).await;
        tracing::trace!(%addr, attempt, %outcome, "tcp ping");
        if let Some(ms) = outcome.elapsed_ms() {
            total_ms += ms;
            succeeded += 1;
        }
    }

    tracing::debug!(%addr, attempts, succeeded, "tcp ping finished");
    (succeeded > 0).then(|| round_ms(total_ms / f64::from(succeeded)))
}

/// Arithmetic mean rounded to two decimals, `None` for an empty sample.
pub fn mean_latency(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    Some(round_ms(mean))
}

fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}
