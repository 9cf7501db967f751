//! Collects request events from simulated users

use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::mpsc;

use super::RequestStats;
use crate::client::RequestOutcome;
use crate::profile::Task;

/// One executed request, sent by a simulated user
#[derive(Debug, Clone)]
pub struct RequestEvent {
    /// Index of the simulated user that issued the request
    pub user_id: usize,
    pub task: Task,
    /// Statistics key, `<METHOD> <path>`
    pub name: String,
    pub outcome: RequestOutcome,
}

/// Per-name request statistics and per-task execution counts
#[derive(Debug, Default)]
pub struct StatsAggregator {
    by_name: BTreeMap<String, RequestStats>,
    task_counts: BTreeMap<Task, u64>,
    active_users: BTreeSet<usize>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: RequestEvent) {
        let failure = event.outcome.failure_reason();
        let failed = failure.is_some();

        metrics::counter!("loadgen_requests_total", "name" => event.name.clone()).increment(1);
        if failed {
            metrics::counter!("loadgen_request_failures_total", "name" => event.name.clone())
                .increment(1);
        }
        metrics::histogram!("loadgen_request_duration_seconds", "name" => event.name.clone())
            .record(event.outcome.latency.as_secs_f64());

        *self.task_counts.entry(event.task).or_insert(0) += 1;
        self.active_users.insert(event.user_id);

        let stats = self.by_name.entry(event.name).or_default();
        stats.requests += 1;
        if let Some(reason) = failure {
            stats.failures += 1;
            *stats.errors.entry(reason).or_insert(0) += 1;
        }
        if let Some(status) = event.outcome.status {
            *stats.status_counts.entry(status).or_insert(0) += 1;
        }
        stats.latencies.record(event.outcome.latency);
    }

    /// Consume events until every sender has been dropped
    pub async fn collect(mut self, mut rx: mpsc::Receiver<RequestEvent>) -> Self {
        while let Some(event) = rx.recv().await {
            self.record(event);
        }
        self
    }

    pub fn by_name(&self) -> &BTreeMap<String, RequestStats> {
        &self.by_name
    }

    pub fn task_counts(&self) -> &BTreeMap<Task, u64> {
        &self.task_counts
    }

    /// Number of distinct users that completed at least one request
    pub fn active_users(&self) -> usize {
        self.active_users.len()
    }

    pub fn total_requests(&self) -> u64 {
        self.by_name.values().map(|s| s.requests).sum()
    }

    pub fn total_failures(&self) -> u64 {
        self.by_name.values().map(|s| s.failures).sum()
    }

    pub(crate) fn into_parts(self) -> (BTreeMap<String, RequestStats>, BTreeMap<Task, u64>) {
        (self.by_name, self.task_counts)
    }
}
