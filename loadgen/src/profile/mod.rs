//! Behavior profile for simulated owners-API users
//!
//! This module provides:
//! - `Task` and `RequestSpec` describing what each action sends
//! - `OwnerPayload` with the two literal owners used for creation
//! - `OwnerBehavior`, the declared task weights and pacing
//! - `Profile`, the validated form consumed by the harness

mod payload;
mod task;

pub use payload::OwnerPayload;
pub use task::{Method, RequestSpec, Task};

use crate::error::LoadgenError;
use crate::pacing::WaitTime;

/// Pause between tasks: uniform in [1.0s, 2.5s]
const OWNER_WAIT_TIME: WaitTime = WaitTime::between_millis(1000, 2500);

/// Declared task weights for one simulated user
const OWNER_TASKS: [(Task, u32); 6] = [
    (Task::ReadOwner, 2),
    (Task::ReadAllOwners, 1),
    (Task::CreateOwner2, 1),
    (Task::ReadOwner2, 2),
    (Task::CreateOwner3, 1),
    (Task::ReadOwner3, 2),
];

/// The owners-API user behavior
pub struct OwnerBehavior;

impl OwnerBehavior {
    pub fn tasks() -> &'static [(Task, u32)] {
        &OWNER_TASKS
    }

    pub fn wait_time() -> WaitTime {
        OWNER_WAIT_TIME
    }

    pub fn total_weight() -> u32 {
        OWNER_TASKS.iter().map(|(_, w)| w).sum()
    }
}

/// Weighted task set plus pacing, ready for the harness
#[derive(Debug, Clone)]
pub struct Profile {
    tasks: Vec<(Task, u32)>,
    wait_time: WaitTime,
}

impl Profile {
    pub fn new(tasks: Vec<(Task, u32)>, wait_time: WaitTime) -> Result<Self, LoadgenError> {
        if tasks.is_empty() {
            return Err(LoadgenError::InvalidProfile(
                "profile declares no tasks".to_string(),
            ));
        }
        if let Some((task, _)) = tasks.iter().find(|(_, w)| *w == 0) {
            return Err(LoadgenError::InvalidProfile(format!(
                "task {} has zero weight",
                task
            )));
        }

        Ok(Self { tasks, wait_time })
    }

    /// Profile for the owners API
    pub fn owner_behavior() -> Self {
        Self {
            tasks: OwnerBehavior::tasks().to_vec(),
            wait_time: OwnerBehavior::wait_time(),
        }
    }

    /// Replace pacing, keeping the task weights
    pub fn with_wait_time(mut self, wait_time: WaitTime) -> Self {
        self.wait_time = wait_time;
        self
    }

    pub fn tasks(&self) -> &[(Task, u32)] {
        &self.tasks
    }

    pub fn wait_time(&self) -> WaitTime {
        self.wait_time
    }

    pub fn total_weight(&self) -> u32 {
        self.tasks.iter().map(|(_, w)| w).sum()
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::owner_behavior()
    }
}
