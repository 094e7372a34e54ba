//!
//! Circuit breaker pattern implementation
//! Prevents hammering a failing upstream, allowing it time to recover
//!

use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{FeedError, FeedResult};

/// Circuit breaker states, each carrying the data it needs for its next
/// decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircuitState {
    /// Normal operation, counting consecutive transient failures
    Closed { failures: u32 },
    /// Calls are rejected until the deadline passes
    Open { until: Instant },
    /// One trial call in flight; its outcome decides what happens next
    HalfOpen { since: Instant },
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed { .. } => write!(f, "closed"),
            CircuitState::Open { .. } => write!(f, "open"),
            CircuitState::HalfOpen { .. } => write!(f, "halfOpen"),
        }
    }
}

/// Circuit breaker shared by every upstream call in the process.
///
/// Only transient failures move the state machine; outcomes where the
/// upstream answered count as successes, whatever the answer was.
#[derive(Debug)]
pub struct CircuitBreaker {
    /// Consecutive transient failures before the circuit opens
    failure_threshold: u32,

    /// How long the circuit stays open once tripped
    break_duration: Duration,

    state: Mutex<CircuitState>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker, starting closed
    pub fn new(failure_threshold: u32, break_duration: Duration) -> Self {
        CircuitBreaker {
            failure_threshold,
            break_duration,
            state: Mutex::new(CircuitState::Closed { failures: 0 }),
        }
    }

    /// Check whether a call may proceed.
    ///
    /// An open circuit whose break has elapsed flips to half-open, and the
    /// caller that saw the flip becomes the single trial. While a trial is
    /// in flight every other caller is rejected; a trial older than the
    /// break duration is presumed abandoned and its slot is handed over.
    pub async fn try_acquire(&self) -> FeedResult<()> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        match *state {
            CircuitState::Closed { .. } => Ok(()),
            CircuitState::Open { until } => {
                if now >= until {
                    *state = CircuitState::HalfOpen { since: now };
                    debug!("circuit break elapsed, allowing a trial call");
                    Ok(())
                } else {
                    Err(FeedError::CircuitOpen {
                        remaining_ms: (until - now).as_millis() as u64,
                    })
                }
            }
            CircuitState::HalfOpen { since } => {
                if now.duration_since(since) >= self.break_duration {
                    *state = CircuitState::HalfOpen { since: now };
                    debug!("previous trial never reported, allowing a new trial call");
                    Ok(())
                } else {
                    Err(FeedError::CircuitOpen { remaining_ms: 0 })
                }
            }
        }
    }

    /// Record an outcome that proves the upstream is answering. Closes the
    /// circuit after a successful trial and resets the failure count.
    pub async fn record_success(&self) {
        let mut state = self.state.lock().await;
        match *state {
            CircuitState::HalfOpen { .. } => {
                info!("circuit closed after successful trial call");
                *state = CircuitState::Closed { failures: 0 };
            }
            CircuitState::Closed { .. } => {
                *state = CircuitState::Closed { failures: 0 };
            }
            // A straggler finished after the trip; the break stands.
            CircuitState::Open { .. } => {}
        }
    }

    /// Record a transient failure. Opens the circuit when the consecutive
    /// count reaches the threshold, or immediately when a trial fails.
    pub async fn record_failure(&self) {
        let mut state = self.state.lock().await;
        match *state {
            CircuitState::Closed { failures } => {
                let failures = failures + 1;
                if failures >= self.failure_threshold {
                    warn!(
                        failures,
                        break_ms = self.break_duration.as_millis() as u64,
                        "circuit opened after consecutive upstream failures"
                    );
                    *state = CircuitState::Open {
                        until: Instant::now() + self.break_duration,
                    };
                } else {
                    *state = CircuitState::Closed { failures };
                }
            }
            CircuitState::HalfOpen { .. } => {
                warn!("trial call failed, circuit re-opened");
                *state = CircuitState::Open {
                    until: Instant::now() + self.break_duration,
                };
            }
            CircuitState::Open { .. } => {}
        }
    }

    /// Snapshot of the current state, for health reporting
    pub async fn state(&self) -> CircuitState {
        *self.state.lock().await
    }
}
