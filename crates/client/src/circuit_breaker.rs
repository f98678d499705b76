use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum CircuitState {
    Closed, // Normal operation
    Open,   // Failing fast until the cooldown expires
}

#[derive(Debug, Default)]
struct HostState {
    failure_count: u32,
    open_until: Option<Instant>,
}

/// Per-host circuit breaker with a two-state model: `Closed` and `Open`
/// with timed auto-reset. There is no half-open probing; once `open_until`
/// has passed, the next call is attempted as a normal call and a success
/// fully resets the entry.
///
/// Host entries are created lazily on first use and updated through the
/// `DashMap` entry API, so concurrent callers to the same host cannot lose
/// increments to each other.
#[derive(Clone)]
pub struct CircuitBreaker {
    hosts: Arc<DashMap<String, HostState>>,
    failure_threshold: u32,
    cooldown: Duration,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            hosts: Arc::new(DashMap::new()),
            failure_threshold,
            cooldown,
        }
    }

    /// Whether a call to `host` may proceed. Checked once per logical call,
    /// before any attempt is made.
    pub fn can_execute(&self, host: &str) -> bool {
        match self.hosts.get(host) {
            Some(state) => match state.open_until {
                Some(until) => {
                    if Instant::now() < until {
                        debug!(%host, "circuit breaker is open, rejecting request");
                        false
                    } else {
                        true
                    }
                }
                None => true,
            },
            None => true,
        }
    }

    /// Record a failed attempt. At the threshold the breaker opens for the
    /// cooldown and the counter resets, so the next open/close cycle needs a
    /// fresh run of failures.
    pub fn record_failure(&self, host: &str) {
        let mut state = self.hosts.entry(host.to_string()).or_default();
        state.failure_count += 1;
        if state.failure_count >= self.failure_threshold {
            warn!(%host, failures = state.failure_count, "circuit breaker opening");
            state.open_until = Some(Instant::now() + self.cooldown);
            state.failure_count = 0;
        } else {
            debug!(%host, failures = state.failure_count, "circuit breaker recorded failure");
        }
    }

    /// Record a successful attempt: zero the counter and close the breaker.
    pub fn record_success(&self, host: &str) {
        let mut state = self.hosts.entry(host.to_string()).or_default();
        state.failure_count = 0;
        state.open_until = None;
    }

    pub fn state_of(&self, host: &str) -> CircuitState {
        match self.hosts.get(host) {
            Some(state) => match state.open_until {
                Some(until) if Instant::now() < until => CircuitState::Open,
                _ => CircuitState::Closed,
            },
            None => CircuitState::Closed,
        }
    }

    pub fn failures(&self, host: &str) -> u32 {
        self.hosts.get(host).map(|s| s.failure_count).unwrap_or(0)
    }
}
