//! Retry with exponential backoff and jitter, wrapped around the breaker

use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::CircuitBreaker;
use crate::config::HackerNewsConfig;
use crate::error::FeedResult;

/// Retry policy applied to every upstream request.
///
/// Transient failures are retried up to `max_retries` times, waiting
/// `base_delay * 2^(k-1)` plus a uniform jitter sample after the k-th
/// failed attempt. Each attempt first has to pass the shared circuit
/// breaker, so a trip aborts the remaining retries with a circuit-open
/// error instead of touching the upstream again.
#[derive(Debug)]
pub struct ResiliencePolicy {
    breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
    jitter_max: Duration,
}

impl ResiliencePolicy {
    pub fn new(
        breaker: Arc<CircuitBreaker>,
        max_retries: u32,
        base_delay: Duration,
        jitter_max: Duration,
    ) -> Self {
        ResiliencePolicy {
            breaker,
            max_retries,
            base_delay,
            jitter_max,
        }
    }

    /// Build the policy from configuration, sharing the given breaker
    pub fn from_config(config: &HackerNewsConfig, breaker: Arc<CircuitBreaker>) -> Self {
        ResiliencePolicy::new(
            breaker,
            config.max_retries,
            config.retry_base_delay(),
            config.retry_jitter_max(),
        )
    }

    /// Run `op` under the policy and return its final outcome.
    ///
    /// `op` is invoked once per attempt. Non-transient failures return
    /// straight away; they also count as breaker successes, because the
    /// upstream answered.
    pub async fn execute<T, F, Fut>(&self, op: F) -> FeedResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = FeedResult<T>>,
    {
        let attempts = self.max_retries + 1;
        let mut attempt = 1;

        loop {
            self.breaker.try_acquire().await?;

            match op().await {
                Ok(value) => {
                    self.breaker.record_success().await;
                    return Ok(value);
                }
                Err(err) if err.is_transient() => {
                    self.breaker.record_failure().await;
                    if attempt >= attempts {
                        return Err(err);
                    }
                    let delay = self.backoff_delay(attempt);
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient upstream failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    self.breaker.record_success().await;
                    return Err(err);
                }
            }
        }
    }

    /// Delay after the k-th failed attempt: `base * 2^(k-1)` plus a sample
    /// from `[0, jitter_max]`, both bounds inclusive
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay.mul_f64(f64::powi(2.0, attempt as i32 - 1));
        let jitter_ms = rand::thread_rng().gen_range(0..=self.jitter_max.as_millis() as u64);
        exponential + Duration::from_millis(jitter_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt_within_jitter_bounds() {
        let breaker = Arc::new(CircuitBreaker::new(5, Duration::from_secs(30)));
        let policy = ResiliencePolicy::new(
            breaker,
            3,
            Duration::from_millis(100),
            Duration::from_millis(50),
        );

        for (attempt, base_ms) in [(1u32, 100u128), (2, 200), (3, 400)] {
            let delay = policy.backoff_delay(attempt).as_millis();
            assert!(
                delay >= base_ms && delay <= base_ms + 50,
                "attempt {attempt}: {delay}ms outside [{base_ms}, {}]",
                base_ms + 50
            );
        }
    }
}
