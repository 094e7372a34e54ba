//! Best-stories aggregation
//!
//! Resolves the ranked id list into full stories: first N ids, bounded
//! concurrent item fetches with one result slot per id, non-stories
//! dropped, everything sorted by descending score.

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::client::StoryFeed;
use crate::model::RankedStory;

/// Resolves the ranked best-story list to full stories
pub struct BestStoriesService {
    feed: Arc<dyn StoryFeed>,
    max_concurrency: usize,
}

impl BestStoriesService {
    pub fn new(feed: Arc<dyn StoryFeed>, max_concurrency: usize) -> Self {
        BestStoriesService {
            feed,
            max_concurrency,
        }
    }

    /// The top `count` best stories, highest score first.
    ///
    /// Equal scores keep the order of the upstream id list; the sort is
    /// stable. Upstream failures shrink the result instead of raising,
    /// and dropping the returned future cancels any in-flight fetches.
    pub async fn get_best_stories(&self, count: usize) -> Vec<RankedStory> {
        let ids = self.feed.best_story_ids().await;
        if ids.is_empty() {
            warn!("no best story ids available, returning an empty result");
            return Vec::new();
        }

        let take = count.min(ids.len());
        let gate = Arc::new(Semaphore::new(self.max_concurrency));

        // One future per selected id, each writing its own slot, so
        // completion order cannot mix up which item belongs to which id.
        let fetches = ids[..take].iter().map(|&id| {
            let feed = Arc::clone(&self.feed);
            let gate = Arc::clone(&gate);
            async move {
                // The gate outlives every fetch; acquire only fails on close.
                let Ok(_permit) = gate.acquire().await else {
                    return (id, None);
                };
                (id, feed.item(id).await)
            }
        });
        let slots = join_all(fetches).await;

        let mut stories: Vec<RankedStory> = slots
            .into_iter()
            .filter_map(|(id, item)| match item {
                Some(item) if item.is_story() => Some(RankedStory::from_item(id, &item)),
                _ => None,
            })
            .collect();

        stories.sort_by(|a, b| b.score.cmp(&a.score));
        stories
    }
}
