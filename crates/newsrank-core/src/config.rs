//! Configuration for the upstream feed and the policies around it

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{FeedError, FeedResult};

/// Settings for the Hacker News upstream: base URL, cache TTLs, fan-out
/// limits and the retry / circuit-breaker knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackerNewsConfig {
    /// Upstream API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// TTL of the cached best-story id list, in seconds
    #[serde(default = "default_best_stories_cache_seconds")]
    pub best_stories_cache_seconds: u64,

    /// TTL of cached items, in seconds. Items change far less often than
    /// the ranking, so this is the longer of the two.
    #[serde(default = "default_item_cache_seconds")]
    pub item_cache_seconds: u64,

    /// Maximum number of item fetches in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Upper bound a caller may request in one go
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Per-request HTTP timeout, in seconds
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,

    /// Retries after the first attempt, for transient failures only
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay of the exponential backoff, in seconds
    #[serde(default = "default_retry_base_delay_seconds")]
    pub retry_base_delay_seconds: f64,

    /// Upper bound of the uniform jitter added to each backoff, in ms
    #[serde(default = "default_retry_jitter_max_ms")]
    pub retry_jitter_max_ms: u64,

    /// Consecutive transient failures before the circuit opens
    #[serde(default = "default_circuit_breaker_failures")]
    pub circuit_breaker_failures: u32,

    /// How long the circuit stays open, in seconds
    #[serde(default = "default_circuit_breaker_break_seconds")]
    pub circuit_breaker_break_seconds: u64,
}

fn default_base_url() -> String {
    "https://hacker-news.firebaseio.com/".to_string()
}

fn default_best_stories_cache_seconds() -> u64 {
    120
}

fn default_item_cache_seconds() -> u64 {
    600
}

fn default_max_concurrency() -> usize {
    10
}

fn default_max_items() -> usize {
    500
}

fn default_http_timeout_seconds() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_seconds() -> f64 {
    0.5
}

fn default_retry_jitter_max_ms() -> u64 {
    250
}

fn default_circuit_breaker_failures() -> u32 {
    5
}

fn default_circuit_breaker_break_seconds() -> u64 {
    30
}

fn must_be_positive(name: &str) -> FeedError {
    FeedError::InvalidConfig(format!("{name} must be positive"))
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        HackerNewsConfig {
            base_url: default_base_url(),
            best_stories_cache_seconds: default_best_stories_cache_seconds(),
            item_cache_seconds: default_item_cache_seconds(),
            max_concurrency: default_max_concurrency(),
            max_items: default_max_items(),
            http_timeout_seconds: default_http_timeout_seconds(),
            max_retries: default_max_retries(),
            retry_base_delay_seconds: default_retry_base_delay_seconds(),
            retry_jitter_max_ms: default_retry_jitter_max_ms(),
            circuit_breaker_failures: default_circuit_breaker_failures(),
            circuit_breaker_break_seconds: default_circuit_breaker_break_seconds(),
        }
    }
}

impl HackerNewsConfig {
    /// Validate the configuration. Every option must be positive; runtime
    /// code relies on that and does not re-check.
    pub fn validate(&self) -> FeedResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(FeedError::InvalidConfig(
                "base_url must not be empty".to_string(),
            ));
        }
        if self.best_stories_cache_seconds == 0 {
            return Err(must_be_positive("best_stories_cache_seconds"));
        }
        if self.item_cache_seconds == 0 {
            return Err(must_be_positive("item_cache_seconds"));
        }
        if self.max_concurrency == 0 {
            return Err(must_be_positive("max_concurrency"));
        }
        if self.max_items == 0 {
            return Err(must_be_positive("max_items"));
        }
        if self.http_timeout_seconds == 0 {
            return Err(must_be_positive("http_timeout_seconds"));
        }
        if self.max_retries == 0 {
            return Err(must_be_positive("max_retries"));
        }
        if self.retry_base_delay_seconds <= 0.0 {
            return Err(must_be_positive("retry_base_delay_seconds"));
        }
        if self.retry_jitter_max_ms == 0 {
            return Err(must_be_positive("retry_jitter_max_ms"));
        }
        if self.circuit_breaker_failures == 0 {
            return Err(must_be_positive("circuit_breaker_failures"));
        }
        if self.circuit_breaker_break_seconds == 0 {
            return Err(must_be_positive("circuit_breaker_break_seconds"));
        }

        Ok(())
    }

    pub fn best_stories_ttl(&self) -> Duration {
        Duration::from_secs(self.best_stories_cache_seconds)
    }

    pub fn item_ttl(&self) -> Duration {
        Duration::from_secs(self.item_cache_seconds)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_base_delay_seconds)
    }

    pub fn retry_jitter_max(&self) -> Duration {
        Duration::from_millis(self.retry_jitter_max_ms)
    }

    pub fn circuit_breaker_break(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_break_seconds)
    }
}
