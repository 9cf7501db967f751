//! Request statistics collected during a load test

mod aggregator;
mod summary;

pub use aggregator::{RequestEvent, StatsAggregator};
pub use summary::{RequestStatsRow, RunSummary};

use std::collections::BTreeMap;
use std::time::Duration;

/// Latency histogram for one request name
///
/// Latencies are rounded to whole milliseconds, then bucketed: exact below
/// 100 ms, to the nearest 10 ms below 1 s, to the nearest 100 ms above.
/// Memory grows with the number of distinct buckets, not with requests.
#[derive(Debug, Clone, Default)]
pub struct LatencyStats {
    buckets: BTreeMap<u64, u64>,
    count: u64,
    total: Duration,
    min: Option<Duration>,
    max: Option<Duration>,
}

fn bucket_ms(latency: Duration) -> u64 {
    let ms = ((latency.as_micros() + 500) / 1000).min(u64::MAX as u128) as u64;
    match ms {
        0..100 => ms,
        100..1000 => (ms + 5) / 10 * 10,
        _ => ms.saturating_add(50) / 100 * 100,
    }
}

impl LatencyStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, latency: Duration) {
        *self.buckets.entry(bucket_ms(latency)).or_insert(0) += 1;
        self.count += 1;
        self.total = self.total.saturating_add(latency);
        self.min = Some(self.min.map_or(latency, |m| m.min(latency)));
        self.max = Some(self.max.map_or(latency, |m| m.max(latency)));
    }

    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of distinct latency buckets in use
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Smallest bucket holding at least `p` percent of the samples (0-100)
    fn percentile(&self, p: f64) -> Option<Duration> {
        if self.count == 0 {
            return None;
        }

        let rank = ((p / 100.0) * self.count as f64).ceil().max(1.0) as u64;
        let mut seen = 0;
        for (&ms, &n) in &self.buckets {
            seen += n;
            if seen >= rank {
                return Some(Duration::from_millis(ms));
            }
        }
        self.buckets.keys().next_back().map(|&ms| Duration::from_millis(ms))
    }

    pub fn p50(&self) -> Option<Duration> {
        self.percentile(50.0)
    }

    pub fn p95(&self) -> Option<Duration> {
        self.percentile(95.0)
    }

    pub fn p99(&self) -> Option<Duration> {
        self.percentile(99.0)
    }

    pub fn min(&self) -> Option<Duration> {
        self.min
    }

    pub fn max(&self) -> Option<Duration> {
        self.max
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.count == 0 {
            return None;
        }
        let nanos = self.total.as_nanos() / u128::from(self.count);
        Some(Duration::from_nanos(nanos.min(u64::MAX as u128) as u64))
    }
}

/// Aggregate counters for one request name (e.g. `GET /owners/1`)
#[derive(Debug, Clone, Default)]
pub struct RequestStats {
    pub requests: u64,
    pub failures: u64,
    /// Responses by HTTP status; transport errors are not included
    pub status_counts: BTreeMap<u16, u64>,
    /// Failures by reason: the transport error text or `HTTP <status>`
    pub errors: BTreeMap<String, u64>,
    pub latencies: LatencyStats,
}

impl RequestStats {
    pub fn failure_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.failures as f64 / self.requests as f64
        }
    }
}
