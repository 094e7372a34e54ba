//!
//! Newsrank Core - resilient Hacker News best-stories aggregation
//!
//! The crate is layered bottom-up: a raw HTTP client that absorbs upstream
//! failures, a retry + circuit-breaker policy around every request, a TTL
//! caching decorator, and the aggregation service that resolves the ranked
//! id list into sorted stories.

/// Caching decorator over the story feed
pub mod cache;

/// Upstream feed trait and HTTP client
pub mod client;

/// Configuration module
pub mod config;

/// Error module
pub mod error;

/// Wiring of client, policy, cache and service
pub mod factory;

/// Domain model: ids, raw items, ranked stories
pub mod model;

/// Retry and circuit-breaker policies
pub mod resilience;

/// Best-stories aggregation service
pub mod stories;

// Re-export key types
pub use cache::CachedStoryFeed;
pub use client::{HackerNewsClient, StoryFeed};
pub use config::HackerNewsConfig;
pub use error::{FeedError, FeedResult};
pub use factory::build_best_stories;
pub use model::{FeedItem, RankedStory, StoryId};
pub use resilience::{CircuitBreaker, CircuitState, ResiliencePolicy};
pub use stories::BestStoriesService;
