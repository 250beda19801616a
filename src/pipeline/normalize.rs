// src/pipeline/normalize.rs

//! Engagement normalization.

use crate::models::{NormalizedItem, RawItem};

/// Map a raw item into a normalized item with its engagement score.
///
/// Missing counts are treated as 0. A missing permalink leaves only
/// `permalink_base`, which is not a valid thread link.
pub fn normalize(raw: &RawItem, source_id: &str, permalink_base: &str) -> NormalizedItem {
    let score = raw.score.unwrap_or(0);
    let num_comments = raw.num_comments.unwrap_or(0);

    NormalizedItem {
        source_id: source_id.to_string(),
        title: raw.title.clone().unwrap_or_default(),
        url: raw.url.clone().unwrap_or_default(),
        score,
        num_comments,
        created_utc: raw.created_utc.unwrap_or(0.0),
        engagement: score.saturating_add(num_comments),
        permalink: format!(
            "{}{}",
            permalink_base,
            raw.permalink.as_deref().unwrap_or_default()
        ),
    }
}
