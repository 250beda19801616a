// src/pipeline/collect.rs

//! Sequential fetch → normalize → rank over all configured sources.

use std::time::Duration;

use crate::models::{Config, RunOutput};
use crate::services::{ListingSource, log_fetch_error};

use super::normalize::normalize;
use super::rank::rank;

/// Inputs of one collection run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Sources in processing order
    pub sources: Vec<String>,
    /// Items requested per source
    pub limit: u32,
    /// Items kept per source
    pub top_n: usize,
    /// Sleep after each source
    pub pace: Duration,
    /// Prefix for absolute permalinks
    pub permalink_base: String,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sources: config.sources.clone(),
            limit: config.fetcher.limit,
            top_n: config.ranking.top_n,
            pace: config.fetcher.pace(),
            permalink_base: config.fetcher.permalink_base.clone(),
        }
    }
}

/// Result of one collection pass.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub output: RunOutput,
    /// Sources whose fetch failed, in processing order
    pub failed: Vec<String>,
}

impl Collection {
    /// Number of sources fetched without error, empty listings included.
    pub fn succeeded(&self) -> usize {
        self.output.source_count().saturating_sub(self.failed.len())
    }
}

/// Collect the top items of every source, one source at a time.
///
/// A source that fails to fetch contributes an empty list. The pace is
/// applied after every source, the last one included.
pub async fn run_collection(client: &dyn ListingSource, settings: &RunSettings) -> RunOutput {
    collect_sources(client, settings).await.output
}

/// Same as [`run_collection`], also reporting which sources failed.
pub async fn collect_sources(client: &dyn ListingSource, settings: &RunSettings) -> Collection {
    let mut collection = Collection::default();

    for source_id in &settings.sources {
        log::info!("Fetching posts from r/{}...", source_id);
        let raw_items = match client.try_fetch(source_id, settings.limit).await {
            Ok(items) => items,
            Err(e) => {
                log_fetch_error(source_id, &e);
                collection.failed.push(source_id.clone());
                Vec::new()
            }
        };

        let normalized: Vec<_> = raw_items
            .iter()
            .map(|raw| normalize(raw, source_id, &settings.permalink_base))
            .collect();
        let fetched = normalized.len();
        let top = rank(normalized, settings.top_n);

        log::info!("Found {} posts. Top {}:", fetched, settings.top_n);
        for (i, item) in top.iter().enumerate() {
            log::info!("{}", item.format_line(i + 1));
        }

        collection.output.insert(source_id.clone(), top);

        if !settings.pace.is_zero() {
            tokio::time::sleep(settings.pace).await;
        }
    }

    collection
}
