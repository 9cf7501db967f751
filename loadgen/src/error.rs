//! Error definitions for the load generator

use thiserror::Error;

/// Errors that can occur while configuring or running a load test
#[derive(Debug, Error)]
pub enum LoadgenError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid wait time: min={min}s, max={max}s")]
    InvalidWaitTime { min: f64, max: f64 },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Stats collector failed: {0}")]
    Collector(#[from] tokio::task::JoinError),

    #[error("Metrics exporter error: {0}")]
    MetricsExporter(String),
}
