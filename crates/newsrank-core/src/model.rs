//! Domain model for the best-stories service
//!
//! `FeedItem` mirrors the upstream item payload, where every field is
//! optional. `RankedStory` is the flat view handed to callers, with
//! defaults substituted for anything the upstream left out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an upstream item. Treated as opaque; it is only ever
/// received from the feed and echoed back into item lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(u64);

impl StoryId {
    /// Create a story id from its raw numeric form
    pub fn new(id: u64) -> Self {
        StoryId(id)
    }

    /// Get the raw numeric value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for StoryId {
    fn from(id: u64) -> Self {
        StoryId(id)
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw item as returned by the upstream feed.
///
/// All fields are optional: the upstream omits fields freely and unknown
/// fields are ignored. Absence is handled at mapping time, never treated
/// as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub id: Option<StoryId>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    /// Account name of the poster
    #[serde(default)]
    pub by: Option<String>,

    /// Posting time in epoch seconds
    #[serde(default)]
    pub time: Option<i64>,

    #[serde(default)]
    pub score: Option<u32>,

    /// Total comment count
    #[serde(default)]
    pub descendants: Option<u32>,

    /// Item kind tag, `"story"` for stories
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl FeedItem {
    /// Whether the item is a story, as opposed to a job, poll or comment
    pub fn is_story(&self) -> bool {
        self.kind.as_deref() == Some("story")
    }
}

/// A story ready to serve: flat, immutable, camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStory {
    pub id: StoryId,
    pub title: String,
    pub uri: String,
    pub posted_by: String,
    pub time: DateTime<Utc>,
    pub score: u32,
    pub comment_count: u32,
}

impl RankedStory {
    /// Build the story view for `id` from a raw item, substituting defaults
    /// for missing fields. The id is the one the item was fetched for, not
    /// whatever the payload carries.
    pub fn from_item(id: StoryId, item: &FeedItem) -> Self {
        RankedStory {
            id,
            title: item.title.clone().unwrap_or_default(),
            uri: item.url.clone().unwrap_or_default(),
            posted_by: item.by.clone().unwrap_or_default(),
            time: epoch_to_utc(item.time.unwrap_or(0)),
            score: item.score.unwrap_or(0),
            comment_count: item.descendants.unwrap_or(0),
        }
    }
}

/// Epoch seconds to UTC, clamping out-of-range values to the epoch itself
fn epoch_to_utc(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}
