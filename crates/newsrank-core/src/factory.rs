//! Wiring of the feed pipeline

use std::sync::Arc;

use crate::cache::CachedStoryFeed;
use crate::client::HackerNewsClient;
use crate::config::HackerNewsConfig;
use crate::error::FeedResult;
use crate::resilience::{CircuitBreaker, ResiliencePolicy};
use crate::stories::BestStoriesService;

/// Build the best-stories pipeline from configuration: HTTP client, shared
/// resilience policy, caching decorator, aggregation service.
///
/// The breaker handle is returned alongside the service so its state can
/// be reported without another way into the pipeline.
pub fn build_best_stories(
    config: &HackerNewsConfig,
) -> FeedResult<(BestStoriesService, Arc<CircuitBreaker>)> {
    config.validate()?;

    let breaker = Arc::new(CircuitBreaker::new(
        config.circuit_breaker_failures,
        config.circuit_breaker_break(),
    ));
    let policy = Arc::new(ResiliencePolicy::from_config(config, Arc::clone(&breaker)));
    let client = HackerNewsClient::new(config, policy)?;
    let feed = Arc::new(CachedStoryFeed::new(
        Arc::new(client),
        config.best_stories_ttl(),
        config.item_ttl(),
    ));
    let service = BestStoriesService::new(feed, config.max_concurrency);

    Ok((service, breaker))
}
