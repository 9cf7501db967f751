//! Pacing between consecutive tasks of a simulated user

use rand::Rng;
use std::time::Duration;

use crate::error::LoadgenError;

/// Uniform wait drawn from a closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTime {
    min: Duration,
    max: Duration,
}

impl WaitTime {
    /// Wait time from millisecond literals, checked at compile time when bound to a `const`
    pub const fn between_millis(min_ms: u64, max_ms: u64) -> Self {
        assert!(min_ms <= max_ms, "wait time bounds are inverted");
        Self {
            min: Duration::from_millis(min_ms),
            max: Duration::from_millis(max_ms),
        }
    }

    /// Build a wait time from seconds, rejecting inverted, negative or non-finite bounds
    pub fn try_between(min_secs: f64, max_secs: f64) -> Result<Self, LoadgenError> {
        let invalid = || LoadgenError::InvalidWaitTime {
            min: min_secs,
            max: max_secs,
        };

        if !min_secs.is_finite() || !max_secs.is_finite() || min_secs < 0.0 || min_secs > max_secs
        {
            return Err(invalid());
        }

        Ok(Self {
            min: Duration::try_from_secs_f64(min_secs).map_err(|_| invalid())?,
            max: Duration::try_from_secs_f64(max_secs).map_err(|_| invalid())?,
        })
    }

    /// Build a wait time from durations
    pub fn from_durations(min: Duration, max: Duration) -> Result<Self, LoadgenError> {
        if min > max {
            return Err(LoadgenError::InvalidWaitTime {
                min: min.as_secs_f64(),
                max: max.as_secs_f64(),
            });
        }
        Ok(Self { min, max })
    }

    /// No pause at all between tasks
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw one pause. Always within `[min, max]`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }

        let secs = rng.random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs).clamp(self.min, self.max)
    }
}
