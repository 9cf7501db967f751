//! Simulated user loop: select a task, execute it, wait, repeat

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::client::RequestExecutor;
use crate::profile::Profile;
use crate::selector::TaskSelector;
use crate::stats::RequestEvent;

/// Why a user loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserExit {
    /// Shutdown was signalled
    Shutdown,
    /// The stats collector went away
    EventsClosed,
}

/// One independent virtual client
pub struct SimulatedUser {
    id: usize,
    profile: Arc<Profile>,
    selector: TaskSelector,
    executor: Arc<dyn RequestExecutor>,
    rng: ChaCha8Rng,
    events: mpsc::Sender<RequestEvent>,
}

impl SimulatedUser {
    /// A seed makes the user's task sequence and pacing reproducible.
    /// Without one the RNG is seeded from OS entropy.
    pub fn new(
        id: usize,
        profile: Arc<Profile>,
        selector: TaskSelector,
        executor: Arc<dyn RequestExecutor>,
        events: mpsc::Sender<RequestEvent>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        Self {
            id,
            profile,
            selector,
            executor,
            rng,
            events,
        }
    }

    /// Run until shutdown is signalled. Interruptible mid-request and mid-wait.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> UserExit {
        tracing::debug!("User {} started", self.id);

        let exit = loop {
            if *shutdown.borrow() {
                break UserExit::Shutdown;
            }

            let task = self.selector.select(&mut self.rng);
            let request = task.request();

            let outcome = tokio::select! {
                outcome = self.executor.execute(&request) => outcome,
                _ = shutdown.changed() => break UserExit::Shutdown,
            };

            tracing::trace!(
                "User {} {} -> {:?} in {:?}",
                self.id,
                task,
                outcome.status,
                outcome.latency
            );

            let event = RequestEvent {
                user_id: self.id,
                task,
                name: request.name(),
                outcome,
            };
            if self.events.send(event).await.is_err() {
                break UserExit::EventsClosed;
            }

            let pause = self.profile.wait_time().sample(&mut self.rng);
            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = shutdown.changed() => break UserExit::Shutdown,
            }
        };

        tracing::debug!("User {} stopped: {:?}", self.id, exit);
        exit
    }
}
