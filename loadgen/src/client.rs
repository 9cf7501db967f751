//! HTTP client used by simulated users
//!
//! `RequestExecutor` is the seam between the user loop and the network;
//! `OwnersClient` is the reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

use crate::error::LoadgenError;
use crate::profile::{Method, RequestSpec};

/// Result of issuing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// HTTP status, if a response was received
    pub status: Option<u16>,
    /// Time from send until the body was fully read
    pub latency: Duration,
    /// Transport error (connect failure, timeout, body read error)
    pub error: Option<String>,
}

impl RequestOutcome {
    pub fn response(status: u16, latency: Duration) -> Self {
        Self {
            status: Some(status),
            latency,
            error: None,
        }
    }

    pub fn transport_error(error: impl Into<String>, latency: Duration) -> Self {
        Self {
            status: None,
            latency,
            error: Some(error.into()),
        }
    }

    /// Transport errors and statuses of 400 and above count as failures
    pub fn is_failure(&self) -> bool {
        self.failure_reason().is_some()
    }

    /// Why the request failed, used to group failures in the report.
    /// The transport error text wins over the status.
    pub fn failure_reason(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        match self.status {
            Some(status) if status >= 400 => Some(format!("HTTP {}", status)),
            Some(_) => None,
            None => Some("no response".to_string()),
        }
    }
}

/// Something that can issue a `RequestSpec`
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Issue the request. Failures are reported in the outcome, never as an error.
    async fn execute(&self, request: &RequestSpec) -> RequestOutcome;
}

/// reqwest client bound to the target base URL
#[derive(Debug, Clone)]
pub struct OwnersClient {
    http: Client,
    base_url: String,
}

impl OwnersClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LoadgenError> {
        let http = Client::builder()
            .pool_max_idle_per_host(100)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RequestExecutor for OwnersClient {
    async fn execute(&self, request: &RequestSpec) -> RequestOutcome {
        let url = self.url_for(request.path);

        let builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => {
                let builder = self.http.post(&url);
                match &request.body {
                    Some(body) => builder.json(body),
                    None => builder,
                }
            }
        };

        let start = Instant::now();
        match builder.send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                // Drain the body so latency covers the whole response
                match resp.bytes().await {
                    Ok(_) => RequestOutcome::response(status, start.elapsed()),
                    Err(e) => RequestOutcome {
                        status: Some(status),
                        latency: start.elapsed(),
                        error: Some(e.to_string()),
                    },
                }
            }
            Err(e) => {
                tracing::debug!("{} {} failed: {}", request.method, url, e);
                RequestOutcome::transport_error(e.to_string(), start.elapsed())
            }
        }
    }
}
