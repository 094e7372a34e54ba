//! TTL caching decorator over the story feed
//!
//! The id list lives in a single slot with a short TTL; items are cached
//! per id with a longer one. Expiry is checked when an entry is read,
//! nothing runs in the background. Empty lists and absent items are never
//! stored, so a failed fetch gets retried on the next call.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::client::StoryFeed;
use crate::model::{FeedItem, StoryId};

/// A cached value and the instant it stops being valid
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Caching decorator for a [`StoryFeed`].
///
/// Concurrent misses for the same key are not deduplicated; each may go
/// upstream and the last writer wins. Every caller still gets valid data.
pub struct CachedStoryFeed {
    inner: Arc<dyn StoryFeed>,
    best_ids: RwLock<Option<CacheEntry<Vec<StoryId>>>>,
    items: DashMap<StoryId, CacheEntry<FeedItem>>,
    list_ttl: Duration,
    item_ttl: Duration,
}

impl CachedStoryFeed {
    /// Wrap `inner` with the given TTLs
    pub fn new(inner: Arc<dyn StoryFeed>, list_ttl: Duration, item_ttl: Duration) -> Self {
        CachedStoryFeed {
            inner,
            best_ids: RwLock::new(None),
            items: DashMap::new(),
            list_ttl,
            item_ttl,
        }
    }
}

#[async_trait]
impl StoryFeed for CachedStoryFeed {
    async fn best_story_ids(&self) -> Vec<StoryId> {
        {
            let slot = self.best_ids.read().await;
            if let Some(entry) = slot.as_ref() {
                if !entry.is_expired() {
                    return entry.value.clone();
                }
            }
        }

        let ids = self.inner.best_story_ids().await;
        if !ids.is_empty() {
            let mut slot = self.best_ids.write().await;
            *slot = Some(CacheEntry::new(ids.clone(), self.list_ttl));
            debug!(count = ids.len(), "cached best story ids");
        }
        ids
    }

    async fn item(&self, id: StoryId) -> Option<FeedItem> {
        // The guard must not be held across the fetch below, so expiry is
        // noted here and the entry removed after the lookup.
        let mut stale = false;
        if let Some(entry) = self.items.get(&id) {
            if entry.is_expired() {
                stale = true;
            } else {
                return Some(entry.value.clone());
            }
        }
        if stale {
            self.items.remove(&id);
        }

        let fetched = self.inner.item(id).await;
        if let Some(item) = &fetched {
            self.items
                .insert(id, CacheEntry::new(item.clone(), self.item_ttl));
            debug!(story_id = %id, "cached story item");
        }
        fetched
    }
}
