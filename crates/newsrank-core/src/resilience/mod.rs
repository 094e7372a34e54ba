//! Resilience policies for upstream calls
//!
//! A single retry-with-backoff policy wrapped around a process-wide
//! circuit breaker. The retry sits on the outside: every attempt has to
//! pass the breaker first, so a trip cuts a retry sequence short.

mod circuit_breaker;
mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use retry::ResiliencePolicy;
