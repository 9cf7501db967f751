//! End-of-run summary and report formatting

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

use super::{RequestStats, StatsAggregator};
use crate::profile::Task;

fn ms(d: Option<Duration>) -> Option<f64> {
    d.map(|d| d.as_secs_f64() * 1000.0)
}

/// Serializable statistics row for one request name
#[derive(Debug, Clone, Serialize)]
pub struct RequestStatsRow {
    pub name: String,
    pub requests: u64,
    pub failures: u64,
    pub failure_rate: f64,
    pub requests_per_sec: f64,
    pub mean_ms: Option<f64>,
    pub min_ms: Option<f64>,
    pub max_ms: Option<f64>,
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub status_counts: BTreeMap<u16, u64>,
    /// Failures by reason
    pub errors: BTreeMap<String, u64>,
}

impl RequestStatsRow {
    fn from_stats(name: String, stats: &RequestStats, duration: Duration) -> Self {
        let secs = duration.as_secs_f64();
        Self {
            name,
            requests: stats.requests,
            failures: stats.failures,
            failure_rate: stats.failure_rate(),
            requests_per_sec: if secs > 0.0 {
                stats.requests as f64 / secs
            } else {
                0.0
            },
            mean_ms: ms(stats.latencies.mean()),
            min_ms: ms(stats.latencies.min()),
            max_ms: ms(stats.latencies.max()),
            p50_ms: ms(stats.latencies.p50()),
            p95_ms: ms(stats.latencies.p95()),
            p99_ms: ms(stats.latencies.p99()),
            status_counts: stats.status_counts.clone(),
            errors: stats.errors.clone(),
        }
    }
}

/// Result of a finished load test
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub users: usize,
    /// Users that completed at least one request
    pub active_users: usize,
    pub total_requests: u64,
    pub total_failures: u64,
    pub requests: Vec<RequestStatsRow>,
    pub task_counts: BTreeMap<Task, u64>,
}

impl RunSummary {
    pub fn new(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        duration: Duration,
        users: usize,
        aggregator: StatsAggregator,
    ) -> Self {
        let total_requests = aggregator.total_requests();
        let total_failures = aggregator.total_failures();
        let active_users = aggregator.active_users();
        let (by_name, task_counts) = aggregator.into_parts();

        let requests = by_name
            .into_iter()
            .map(|(name, stats)| RequestStatsRow::from_stats(name, &stats, duration))
            .collect();

        Self {
            run_id,
            started_at,
            duration_secs: duration.as_secs_f64(),
            users,
            active_users,
            total_requests,
            total_failures,
            requests,
            task_counts,
        }
    }

    pub fn row(&self, name: &str) -> Option<&RequestStatsRow> {
        self.requests.iter().find(|r| r.name == name)
    }

    pub fn task_count(&self, task: Task) -> u64 {
        self.task_counts.get(&task).copied().unwrap_or(0)
    }

    pub fn failure_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_failures as f64 / self.total_requests as f64
        }
    }

    /// Generate a summary report
    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Owners Load Test Results ===\n\n");
        report.push_str(&format!("Run: {}\n", self.run_id));
        report.push_str(&format!("Started: {}\n", self.started_at.to_rfc3339()));
        report.push_str(&format!("Duration: {:.2}s\n", self.duration_secs));
        report.push_str(&format!(
            "Users: {} ({} issued requests)\n\n",
            self.users, self.active_users
        ));

        report.push_str(&format!(
            "{:<16} {:>8} {:>8} {:>10} {:>10} {:>10} {:>8}\n",
            "Name", "Reqs", "Fails", "P50 (ms)", "P95 (ms)", "P99 (ms)", "Req/s"
        ));
        for row in &self.requests {
            report.push_str(&format!(
                "{:<16} {:>8} {:>8} {:>10} {:>10} {:>10} {:>8.2}\n",
                row.name,
                row.requests,
                row.failures,
                fmt_ms(row.p50_ms),
                fmt_ms(row.p95_ms),
                fmt_ms(row.p99_ms),
                row.requests_per_sec,
            ));
        }

        let throughput = if self.duration_secs > 0.0 {
            self.total_requests as f64 / self.duration_secs
        } else {
            0.0
        };
        report.push_str(&format!(
            "\nTotal: {} requests, {} failures ({:.2}%), {:.2} req/s\n",
            self.total_requests,
            self.total_failures,
            self.failure_rate() * 100.0,
            throughput
        ));

        if self.total_failures > 0 {
            report.push_str("\nFailures:\n");
            for row in &self.requests {
                for (reason, count) in &row.errors {
                    report.push_str(&format!("  {:>8}  {:<16} {}\n", count, row.name, reason));
                }
            }
        }

        report.push_str("\nTask executions:\n");
        for (task, count) in &self.task_counts {
            report.push_str(&format!("  {:<16} {}\n", task.name(), count));
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn fmt_ms(v: Option<f64>) -> String {
    v.map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string())
}
