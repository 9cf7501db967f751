//! Weighted random task selection

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::error::LoadgenError;
use crate::profile::{Profile, Task};

/// Picks a task with probability proportional to its weight
#[derive(Debug, Clone)]
pub struct TaskSelector {
    tasks: Vec<Task>,
    index: WeightedIndex<u32>,
}

impl TaskSelector {
    pub fn new(profile: &Profile) -> Result<Self, LoadgenError> {
        let index = WeightedIndex::new(profile.tasks().iter().map(|(_, w)| *w))
            .map_err(|e| LoadgenError::InvalidProfile(e.to_string()))?;

        Ok(Self {
            tasks: profile.tasks().iter().map(|(t, _)| *t).collect(),
            index,
        })
    }

    pub fn select<R: Rng>(&self, rng: &mut R) -> Task {
        self.tasks[self.index.sample(rng)]
    }
}
