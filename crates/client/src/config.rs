use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the resilient HTTP client: retry schedule, per-attempt
/// timeout and circuit-breaker thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub attempt_timeout_ms: u64,
    pub failure_threshold: u32,
    pub cooldown_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base_ms: 500,
            attempt_timeout_ms: 3_000,
            failure_threshold: 3,
            cooldown_ms: 10_000,
        }
    }
}

impl ClientConfig {
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}
