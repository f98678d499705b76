use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Bounded retry with linear backoff: after the n-th failed attempt the
/// caller sleeps `backoff_base × n` before trying again.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base * attempt
    }

    /// Sleep out the backoff for a failed attempt (1-based).
    pub async fn wait_after_failure(&self, attempt: u32) {
        let backoff = self.backoff(attempt);
        debug!(attempt, ?backoff, "backing off before next attempt");
        sleep(backoff).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_is_linear_and_monotonic() {
        let policy = RetryPolicy::new(3, Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff(3), Duration::from_millis(1500));
    }

    #[test]
    fn at_least_one_attempt() {
        let policy = RetryPolicy::new(0, Duration::from_millis(1));
        assert_eq!(policy.max_attempts(), 1);
    }

    #[tokio::test]
    async fn wait_after_failure_sleeps_the_backoff() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        let started = std::time::Instant::now();
        policy.wait_after_failure(2).await;
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
