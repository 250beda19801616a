// src/pipeline/rank.rs

//! Engagement ranking.

use crate::models::NormalizedItem;

/// Keep the `top_n` items with the highest engagement.
///
/// The sort is stable: items with equal engagement keep their input order.
/// Short input is returned whole.
pub fn rank(mut items: Vec<NormalizedItem>, top_n: usize) -> Vec<NormalizedItem> {
    items.sort_by(|a, b| b.engagement.cmp(&a.engagement));
    items.truncate(top_n);
    items
}
