//! Owners API Load Generator Library
//!
//! Declares the owners-API user behavior and the harness that runs it:
//! simulated users, weighted task selection, pacing, and request statistics.

pub mod client;
pub mod config;
pub mod error;
pub mod pacing;
pub mod profile;
pub mod runner;
pub mod selector;
pub mod stats;
pub mod user;

// Re-export commonly used types
pub use client::{OwnersClient, RequestExecutor, RequestOutcome};
pub use config::Config;
pub use error::LoadgenError;
pub use pacing::WaitTime;
pub use profile::{OwnerBehavior, OwnerPayload, Profile, RequestSpec, Task};
pub use runner::LoadTest;
pub use stats::RunSummary;
