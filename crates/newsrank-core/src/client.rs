//! Upstream story feed: trait and HTTP client
//!
//! The trait is absorbing by contract: failures become empty or absent
//! values plus a warning log, so nothing above this layer handles
//! transport concerns. The HTTP implementation runs every request through
//! the shared resilience policy before giving up.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::config::HackerNewsConfig;
use crate::error::{FeedError, FeedResult};
use crate::model::{FeedItem, StoryId};
use crate::resilience::ResiliencePolicy;

/// Read-only view of the upstream story feed
#[async_trait]
pub trait StoryFeed: Send + Sync {
    /// Ranked ids of the current best stories, best first. Empty when the
    /// upstream cannot be reached.
    async fn best_story_ids(&self) -> Vec<StoryId>;

    /// A single item by id. `None` when the item does not exist or the
    /// upstream cannot be reached.
    async fn item(&self, id: StoryId) -> Option<FeedItem>;
}

/// `StoryFeed` backed by the public Hacker News web API
pub struct HackerNewsClient {
    http: reqwest::Client,
    base_url: String,
    policy: Arc<ResiliencePolicy>,
}

impl HackerNewsClient {
    /// Create a client for the configured upstream, sharing the given
    /// resilience policy
    pub fn new(config: &HackerNewsConfig, policy: Arc<ResiliencePolicy>) -> FeedResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| FeedError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(HackerNewsClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            policy,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch_best_story_ids(&self) -> FeedResult<Vec<StoryId>> {
        let url = self.url("v0/beststories.json");
        let ids = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<StoryId>>()
            .await?;
        Ok(ids)
    }

    async fn fetch_item(&self, id: StoryId) -> FeedResult<Option<FeedItem>> {
        let url = self.url(&format!("v0/item/{id}.json"));
        // Unknown ids come back as a literal JSON null, not a 404.
        let item = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Option<FeedItem>>()
            .await?;
        Ok(item)
    }
}

#[async_trait]
impl StoryFeed for HackerNewsClient {
    async fn best_story_ids(&self) -> Vec<StoryId> {
        match self.policy.execute(|| self.fetch_best_story_ids()).await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(error = %err, "failed to fetch best story ids");
                Vec::new()
            }
        }
    }

    async fn item(&self, id: StoryId) -> Option<FeedItem> {
        match self.policy.execute(|| self.fetch_item(id)).await {
            Ok(item) => item,
            Err(err) => {
                warn!(story_id = %id, error = %err, "failed to fetch story item");
                None
            }
        }
    }
}
