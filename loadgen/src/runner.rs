//! Load test runner
//!
//! Spawns simulated users at the configured rate, lets them run until the
//! run time elapses (or an external stop fires), then stops every user and
//! returns the aggregated statistics.

use chrono::Utc;
use futures_util::future::join_all;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::RequestExecutor;
use crate::config::Config;
use crate::error::LoadgenError;
use crate::profile::Profile;
use crate::selector::TaskSelector;
use crate::stats::{RequestEvent, RunSummary, StatsAggregator};
use crate::user::SimulatedUser;

const EVENT_CHANNEL_CAPACITY: usize = 10_000;

/// A configured load test, ready to run
pub struct LoadTest {
    config: Config,
    profile: Arc<Profile>,
    executor: Arc<dyn RequestExecutor>,
}

impl LoadTest {
    pub fn new(
        config: Config,
        profile: Profile,
        executor: Arc<dyn RequestExecutor>,
    ) -> Result<Self, LoadgenError> {
        config.validate()?;
        Ok(Self {
            config,
            profile: Arc::new(profile),
            executor,
        })
    }

    /// Run until the configured run time elapses or Ctrl+C is pressed
    pub async fn run(self) -> Result<RunSummary, LoadgenError> {
        let run_time = self.config.run_time;
        self.run_until(stop_signal(run_time, tokio::signal::ctrl_c())).await
    }

    /// Run until `stop` completes. The configured run time is not applied.
    pub async fn run_until<F>(self, stop: F) -> Result<RunSummary, LoadgenError>
    where
        F: Future<Output = ()> + Send,
    {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();
        let selector = TaskSelector::new(&self.profile)?;

        info!(
            "Starting run {} with {} users at {}/s against {}",
            run_id, self.config.users, self.config.spawn_rate, self.config.host
        );

        let (events_tx, events_rx) = mpsc::channel::<RequestEvent>(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let collector = tokio::spawn(StatsAggregator::new().collect(events_rx));

        let mut join_handles = Vec::with_capacity(self.config.users);
        let spawn_interval = self.config.spawn_interval()?;

        tokio::pin!(stop);

        // Spawn phase: one user per interval, abandoned early if stopped
        let mut stopped = false;
        for user_id in 0..self.config.users {
            let user = SimulatedUser::new(
                user_id,
                self.profile.clone(),
                selector.clone(),
                self.executor.clone(),
                events_tx.clone(),
                self.config.user_seed(user_id),
            );
            join_handles.push(tokio::spawn(user.run(shutdown_rx.clone())));

            if user_id + 1 < self.config.users {
                tokio::select! {
                    _ = tokio::time::sleep(spawn_interval) => {}
                    _ = &mut stop => {
                        stopped = true;
                        break;
                    }
                }
            }
        }

        let spawned = join_handles.len();
        if stopped {
            info!("Stopped during ramp-up after {} users", spawned);
        } else {
            info!("All {} users spawned", spawned);
            stop.await;
        }

        // Users hold the remaining senders; the collector ends once they exit
        drop(events_tx);
        let _ = shutdown_tx.send(true);

        let grace = self.config.shutdown_grace;
        let abort_handles: Vec<_> = join_handles.iter().map(|h| h.abort_handle()).collect();
        if tokio::time::timeout(grace, join_all(join_handles))
            .await
            .is_err()
        {
            warn!("Users did not stop within {:?}, aborting", grace);
            for handle in abort_handles {
                handle.abort();
            }
        }

        let aggregator = collector.await?;
        let duration = start.elapsed();

        info!(
            "Run {} finished after {:.2}s: {} requests, {} failures",
            run_id,
            duration.as_secs_f64(),
            aggregator.total_requests(),
            aggregator.total_failures()
        );

        Ok(RunSummary::new(run_id, started_at, duration, spawned, aggregator))
    }
}

/// Completes when `run_time` elapses or `interrupt` fires. If listening for
/// the interrupt fails, only the run time ends the run; without one the run
/// never ends on its own.
async fn stop_signal<I>(run_time: Option<Duration>, interrupt: I)
where
    I: Future<Output = io::Result<()>>,
{
    let deadline = async {
        match run_time {
            Some(run_time) => {
                tokio::time::sleep(run_time).await;
                info!("Run time of {:?} reached", run_time);
            }
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    tokio::select! {
        _ = &mut deadline => return,
        result = interrupt => match result {
            Ok(()) => {
                info!("Interrupted by user");
                return;
            }
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        },
    }

    deadline.await;
}
