//! Aggregation behavior: ordering, limits, filtering, bounded fan-out

use async_trait::async_trait;
use chrono::DateTime;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use newsrank_core::client::StoryFeed;
use newsrank_core::model::{FeedItem, StoryId};
use newsrank_core::stories::BestStoriesService;

/// Scripted feed: fixed ids and items, with call and concurrency tracking
struct ScriptedFeed {
    ids: Vec<StoryId>,
    items: HashMap<StoryId, FeedItem>,
    item_delay: Duration,
    item_calls: Mutex<Vec<StoryId>>,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

impl ScriptedFeed {
    fn new(ids: Vec<u64>, items: Vec<FeedItem>) -> Self {
        ScriptedFeed {
            ids: ids.into_iter().map(StoryId::new).collect(),
            items: items
                .into_iter()
                .filter_map(|item| item.id.map(|id| (id, item)))
                .collect(),
            item_delay: Duration::ZERO,
            item_calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
        }
    }

    fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    fn fetched_ids(&self) -> Vec<StoryId> {
        self.item_calls.lock().unwrap().clone()
    }

    fn max_in_flight(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoryFeed for ScriptedFeed {
    async fn best_story_ids(&self) -> Vec<StoryId> {
        self.ids.clone()
    }

    async fn item(&self, id: StoryId) -> Option<FeedItem> {
        self.item_calls.lock().unwrap().push(id);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now, Ordering::SeqCst);
        if !self.item_delay.is_zero() {
            tokio::time::sleep(self.item_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.items.get(&id).cloned()
    }
}

fn story(id: u64, score: u32) -> FeedItem {
    FeedItem {
        id: Some(StoryId::new(id)),
        title: Some(format!("Story {id}")),
        url: Some(format!("https://example.com/{id}")),
        by: Some("alice".to_string()),
        time: Some(1_700_000_000),
        score: Some(score),
        descendants: Some(5),
        kind: Some("story".to_string()),
    }
}

fn service(feed: ScriptedFeed, max_concurrency: usize) -> (BestStoriesService, Arc<ScriptedFeed>) {
    let feed = Arc::new(feed);
    (
        BestStoriesService::new(Arc::clone(&feed) as Arc<dyn StoryFeed>, max_concurrency),
        feed,
    )
}

#[tokio::test]
async fn sorts_by_descending_score() {
    let feed = ScriptedFeed::new(
        vec![1, 2, 3],
        vec![story(1, 10), story(2, 30), story(3, 20)],
    );
    let (service, _) = service(feed, 10);

    let stories = service.get_best_stories(3).await;

    let scores: Vec<u32> = stories.iter().map(|s| s.score).collect();
    assert_eq!(scores, vec![30, 20, 10]);
}

#[tokio::test]
async fn returns_at_most_the_requested_count() {
    let feed = ScriptedFeed::new(
        vec![1, 2, 3],
        vec![story(1, 1), story(2, 2), story(3, 3)],
    );
    let (service, _) = service(feed, 10);

    assert_eq!(service.get_best_stories(2).await.len(), 2);
    assert_eq!(service.get_best_stories(10).await.len(), 3);
    assert!(service.get_best_stories(0).await.is_empty());
}

#[tokio::test]
async fn fetches_only_the_first_n_ids() {
    let feed = ScriptedFeed::new(
        vec![1, 2, 3],
        vec![story(1, 1), story(2, 2), story(3, 3)],
    );
    let (service, feed) = service(feed, 10);

    service.get_best_stories(2).await;

    let fetched = feed.fetched_ids();
    assert!(fetched.contains(&StoryId::new(1)));
    assert!(fetched.contains(&StoryId::new(2)));
    assert!(!fetched.contains(&StoryId::new(3)));
}

#[tokio::test]
async fn drops_non_stories_and_missing_items() {
    let job = FeedItem {
        kind: Some("job".to_string()),
        ..story(2, 50)
    };
    // Id 3 resolves to nothing at all.
    let feed = ScriptedFeed::new(vec![1, 2, 3, 4], vec![story(1, 5), job, story(4, 8)]);
    let (service, _) = service(feed, 10);

    let stories = service.get_best_stories(4).await;

    let ids: Vec<StoryId> = stories.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![StoryId::new(4), StoryId::new(1)]);
}

#[tokio::test]
async fn bounds_concurrent_item_fetches() {
    let items = (1..=5).map(|id| story(id, id as u32)).collect();
    let feed = ScriptedFeed::new(vec![1, 2, 3, 4, 5], items)
        .with_item_delay(Duration::from_millis(50));
    let (service, feed) = service(feed, 2);

    let stories = service.get_best_stories(5).await;

    assert_eq!(stories.len(), 5);
    assert_eq!(feed.max_in_flight(), 2);
}

#[tokio::test]
async fn ties_keep_the_feed_order() {
    let feed = ScriptedFeed::new(
        vec![4, 9, 7],
        vec![story(4, 50), story(9, 50), story(7, 50)],
    );
    let (service, _) = service(feed, 10);

    let stories = service.get_best_stories(3).await;

    let ids: Vec<StoryId> = stories.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![StoryId::new(4), StoryId::new(9), StoryId::new(7)]);
}

#[tokio::test]
async fn empty_id_list_gives_an_empty_result() {
    let feed = ScriptedFeed::new(vec![], vec![]);
    let (service, feed) = service(feed, 10);

    assert!(service.get_best_stories(10).await.is_empty());
    assert!(feed.fetched_ids().is_empty());
}

#[tokio::test]
async fn missing_item_fields_fall_back_to_defaults() {
    let bare = FeedItem {
        id: Some(StoryId::new(1)),
        title: None,
        url: None,
        by: None,
        time: None,
        score: None,
        descendants: None,
        kind: Some("story".to_string()),
    };
    let feed = ScriptedFeed::new(vec![1], vec![bare]);
    let (service, _) = service(feed, 10);

    let stories = service.get_best_stories(1).await;

    assert_eq!(stories.len(), 1);
    let story = &stories[0];
    assert_eq!(story.id, StoryId::new(1));
    assert_eq!(story.title, "");
    assert_eq!(story.uri, "");
    assert_eq!(story.posted_by, "");
    assert_eq!(story.time, DateTime::UNIX_EPOCH);
    assert_eq!(story.score, 0);
    assert_eq!(story.comment_count, 0);
}
