//! Resilient HTTP client for service-to-service calls.
//!
//! Wraps `reqwest` with bounded retries (linear backoff) and a per-host
//! circuit breaker. Transport errors and 5xx responses are retried; 4xx
//! responses from a reachable peer are definitive and returned to the
//! caller unretried, though they still count against the breaker.

pub mod circuit_breaker;
pub mod config;
pub mod retry;

use reqwest::header::HeaderMap;
use reqwest::{Method, Response, Url};
use thiserror::Error;
use tracing::{debug, warn};

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use config::ClientConfig;
pub use retry::RetryPolicy;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid url {0}")]
    InvalidUrl(String),
    #[error("circuit breaker open for {0}")]
    CircuitOpen(String),
    #[error("{host} unavailable after {attempts} attempts: {reason}")]
    Unavailable {
        host: String,
        attempts: u32,
        reason: String,
    },
}

/// HTTP client with per-host circuit breaking and bounded retries.
///
/// Cheap to clone; clones share the underlying connection pool and breaker
/// state. Construct one per process and inject it where outbound calls are
/// made.
#[derive(Clone)]
pub struct ResilientClient {
    http: reqwest::Client,
    breaker: CircuitBreaker,
    retry: RetryPolicy,
}

impl ResilientClient {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.attempt_timeout())
            .build()?;
        Ok(Self {
            http,
            breaker: CircuitBreaker::new(config.failure_threshold, config.cooldown()),
            retry: RetryPolicy::new(config.max_attempts, config.backoff_base()),
        })
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response, ClientError> {
        self.request(Method::GET, url, headers, None).await
    }

    pub async fn post_json(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> Result<Response, ClientError> {
        self.request(Method::POST, url, headers, Some(body)).await
    }

    /// Issue one logical request. The breaker is consulted once, up front;
    /// an open breaker short-circuits every attempt. Each attempt carries
    /// its own timeout, and every failed attempt is followed by a linear
    /// backoff sleep.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let host = host_key(url)?;

        if !self.breaker.can_execute(&host) {
            return Err(ClientError::CircuitOpen(host));
        }

        let mut last_error = String::new();
        for attempt in 1..=self.retry.max_attempts() {
            let mut req = self.http.request(method.clone(), url).headers(headers.clone());
            if let Some(json) = body {
                req = req.json(json);
            }

            match req.send().await {
                Ok(resp) if resp.status().is_success() => {
                    self.breaker.record_success(&host);
                    if attempt > 1 {
                        debug!(%host, attempt, "request succeeded after retries");
                    }
                    return Ok(resp);
                }
                Ok(resp) if resp.status().is_client_error() => {
                    // A reachable peer answered; the status is definitive.
                    self.breaker.record_failure(&host);
                    debug!(%host, status = %resp.status(), "client error response, not retrying");
                    return Ok(resp);
                }
                Ok(resp) => {
                    self.breaker.record_failure(&host);
                    last_error = format!("upstream returned {}", resp.status());
                    warn!(%host, attempt, status = %resp.status(), "attempt failed");
                }
                Err(e) => {
                    self.breaker.record_failure(&host);
                    last_error = e.to_string();
                    warn!(%host, attempt, error = %last_error, "attempt failed");
                }
            }
            self.retry.wait_after_failure(attempt).await;
        }

        Err(ClientError::Unavailable {
            host,
            attempts: self.retry.max_attempts(),
            reason: last_error,
        })
    }
}

/// Breaker key: the network host portion of the target URL, including the
/// port so that two services on one machine break independently.
fn host_key(url: &str) -> Result<String, ClientError> {
    let parsed = Url::parse(url).map_err(|_| ClientError::InvalidUrl(url.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ClientError::InvalidUrl(url.to_string()))?;
    match parsed.port_or_known_default() {
        Some(port) => Ok(format!("{host}:{port}")),
        None => Ok(host.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_key_includes_port() {
        assert_eq!(
            host_key("http://127.0.0.1:8002/reserve").unwrap(),
            "127.0.0.1:8002"
        );
        assert_eq!(host_key("http://users.internal/1").unwrap(), "users.internal:80");
        assert!(host_key("not a url").is_err());
    }
}
