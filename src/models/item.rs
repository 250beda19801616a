//! Forum item data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing envelope returned by the `new.json` endpoint.
///
/// Every level is optional; a missing `data` or `children` key is an empty listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub data: ListingData,
}

/// Body of a listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

/// One entry of a listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingChild {
    #[serde(default)]
    pub data: RawItem,
}

impl Listing {
    /// Consume the envelope and return its items in arrival order.
    pub fn into_items(self) -> Vec<RawItem> {
        self.data.children.into_iter().map(|c| c.data).collect()
    }
}

/// A post as returned by the forum API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub score: Option<i64>,

    #[serde(default)]
    pub num_comments: Option<i64>,

    /// Unix seconds; the API reports it as a float
    #[serde(default)]
    pub created_utc: Option<f64>,

    /// Path relative to the forum host, e.g. `/r/n8n/comments/abc/title/`
    #[serde(default)]
    pub permalink: Option<String>,
}

/// A post with its derived engagement score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    /// Source (subreddit) the post was listed under
    #[serde(rename = "subreddit")]
    pub source_id: String,

    pub title: String,

    pub url: String,

    pub score: i64,

    pub num_comments: i64,

    pub created_utc: f64,

    /// `score + num_comments`, fixed at normalization time
    pub engagement: i64,

    /// Absolute link to the discussion thread
    pub permalink: String,
}

impl NormalizedItem {
    /// Creation time as a UTC timestamp, if representable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_utc.trunc() as i64, 0)
    }

    /// Single-line rendering used in run logs.
    pub fn format_line(&self, rank: usize) -> String {
        format!(
            "{}. [{}] {} ({})",
            rank, self.engagement, self.title, self.permalink
        )
    }
}
