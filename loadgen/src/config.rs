//! Load test configuration
//!
//! Configuration is loaded from `LOADGEN_*` environment variables. Values that
//! fail to parse are ignored and the default is kept.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::LoadgenError;

/// Main load test configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Target base URL (e.g., "http://localhost:8081")
    pub host: String,
    /// Number of simulated users
    pub users: usize,
    /// Users started per second
    pub spawn_rate: f64,
    /// Run duration; `None` runs until Ctrl+C
    pub run_time: Option<Duration>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Base RNG seed; user N is seeded with `seed + N`
    pub seed: Option<u64>,
    /// How long to wait for users to stop after shutdown
    pub shutdown_grace: Duration,
    /// Prometheus exporter listen address
    pub metrics_addr: Option<SocketAddr>,
    /// Also print the summary as JSON
    pub json_report: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "http://localhost:8081".to_string(),
            users: 10,
            spawn_rate: 1.0,
            run_time: None,
            request_timeout: Duration::from_secs(30),
            seed: None,
            shutdown_grace: Duration::from_secs(5),
            metrics_addr: None,
            json_report: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("LOADGEN_HOST")
            && !host.is_empty()
        {
            config.host = host;
        }
        if let Ok(val) = env::var("LOADGEN_USERS")
            && let Ok(v) = val.parse()
        {
            config.users = v;
        }
        if let Ok(val) = env::var("LOADGEN_SPAWN_RATE")
            && let Ok(v) = val.parse()
        {
            config.spawn_rate = v;
        }
        if let Ok(val) = env::var("LOADGEN_RUN_TIME_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.run_time = Some(Duration::from_secs(secs));
        }
        if let Ok(val) = env::var("LOADGEN_REQUEST_TIMEOUT_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Ok(val) = env::var("LOADGEN_SEED")
            && let Ok(seed) = val.parse()
        {
            config.seed = Some(seed);
        }
        if let Ok(val) = env::var("LOADGEN_SHUTDOWN_GRACE_SECS")
            && let Ok(secs) = val.parse::<u64>()
        {
            config.shutdown_grace = Duration::from_secs(secs);
        }
        if let Ok(val) = env::var("LOADGEN_METRICS_ADDR")
            && let Ok(addr) = val.parse()
        {
            config.metrics_addr = Some(addr);
        }
        if let Ok(val) = env::var("LOADGEN_JSON_REPORT") {
            config.json_report = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    pub fn validate(&self) -> Result<(), LoadgenError> {
        if self.host.is_empty() {
            return Err(LoadgenError::InvalidConfig("host is empty".to_string()));
        }
        if !self.host.starts_with("http://") && !self.host.starts_with("https://") {
            return Err(LoadgenError::InvalidConfig(format!(
                "host {:?} must start with http:// or https://",
                self.host
            )));
        }
        if self.users == 0 {
            return Err(LoadgenError::InvalidConfig(
                "at least one user is required".to_string(),
            ));
        }
        if !self.spawn_rate.is_finite() || self.spawn_rate <= 0.0 {
            return Err(LoadgenError::InvalidConfig(format!(
                "spawn rate must be positive, got {}",
                self.spawn_rate
            )));
        }
        self.spawn_interval()?;
        Ok(())
    }

    /// Delay between two consecutive user spawns. Rates so small that the
    /// interval overflows a `Duration` are rejected.
    pub fn spawn_interval(&self) -> Result<Duration, LoadgenError> {
        Duration::try_from_secs_f64(1.0 / self.spawn_rate).map_err(|_| {
            LoadgenError::InvalidConfig(format!(
                "spawn rate {} is too small to schedule users",
                self.spawn_rate
            ))
        })
    }

    /// Seed for a given user, if the run is seeded
    pub fn user_seed(&self, user_id: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(user_id as u64))
    }
}
