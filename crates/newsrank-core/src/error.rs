//! Error types for upstream fetches and configuration
//!
//! Failures are classified once, here, and the rest of the crate only asks
//! `is_transient()`: transient failures are retried and counted by the
//! circuit breaker, everything else returns straight away.

use thiserror::Error;

/// Result type for feed operations
pub type FeedResult<T> = std::result::Result<T, FeedError>;

/// Errors that can occur while talking to the upstream feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// The request exceeded the configured HTTP timeout
    #[error("request to the story feed timed out")]
    Timeout,

    /// The upstream answered with a non-success status
    #[error("story feed returned HTTP status {0}")]
    Status(u16),

    /// The upstream could not be reached at all
    #[error("failed to reach the story feed: {0}")]
    Transport(String),

    /// The upstream answered but the body did not decode
    #[error("story feed returned a malformed payload: {0}")]
    Malformed(String),

    /// The circuit breaker rejected the call
    #[error("circuit open, next trial allowed in {remaining_ms}ms")]
    CircuitOpen { remaining_ms: u64 },

    /// Configuration error
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FeedError {
    /// Whether the failure is worth retrying. Timeouts, transport failures
    /// and 5xx/429 statuses are transient; anything else means the upstream
    /// answered and retrying would not change the outcome.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::Timeout | FeedError::Transport(_) => true,
            FeedError::Status(code) => *code >= 500 || *code == 429,
            FeedError::Malformed(_) | FeedError::CircuitOpen { .. } | FeedError::InvalidConfig(_) => {
                false
            }
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout
        } else if let Some(status) = err.status() {
            FeedError::Status(status.as_u16())
        } else if err.is_decode() {
            FeedError::Malformed(err.to_string())
        } else {
            FeedError::Transport(err.to_string())
        }
    }
}
