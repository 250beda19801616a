// src/pipeline/pipeline.rs

use chrono::Utc;

use crate::models::{Config, PersistReport, RunSummary};
use crate::services::ListingSource;
use crate::storage::DocumentStore;

use super::collect::{RunSettings, collect_sources};
use super::persist::persist;

/// Run one full collection: collect every source, then persist the result.
///
/// Both the CLI and the Lambda handler go through here. Failures of single
/// sources or destinations never abort the run; they show up as empty lists
/// and failed outcomes in the returned summary.
pub async fn run_pipeline(
    config: &Config,
    client: &dyn ListingSource,
    store: Option<&dyn DocumentStore>,
) -> RunSummary {
    let start_time = Utc::now();
    log::info!("Starting collection for {} sources", config.sources.len());

    let settings = RunSettings::from_config(config);
    let collection = collect_sources(client, &settings).await;

    let report = if config.output.skip_when_empty && collection.succeeded() == 0 {
        log::info!("No data fetched. Skipping persistence.");
        PersistReport::default()
    } else {
        persist(&collection.output, &config.destinations(), store).await
    };
    let output = collection.output;

    let end_time = Utc::now();
    log::info!(
        "Collection completed: {} items from {} sources ({} failed), {} written, {} skipped, {} failed",
        output.item_count(),
        output.source_count(),
        collection.failed.len(),
        report.written(),
        report.skipped(),
        report.failed()
    );

    RunSummary {
        output,
        failed_sources: collection.failed,
        report,
        start_time,
        end_time,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::error::{AppError, Result};
    use crate::models::RawItem;
    use crate::storage::read_output;

    struct StaticSource(Vec<RawItem>);

    #[async_trait]
    impl ListingSource for StaticSource {
        async fn try_fetch(&self, _source_id: &str, _limit: u32) -> Result<Vec<RawItem>> {
            Ok(self.0.clone())
        }
    }

    /// Every fetch fails with a rate-limit status.
    struct DownSource;

    #[async_trait]
    impl ListingSource for DownSource {
        async fn try_fetch(&self, source_id: &str, _limit: u32) -> Result<Vec<RawItem>> {
            Err(AppError::Status {
                status: 429,
                url: format!("https://www.reddit.com/r/{source_id}/new.json"),
            })
        }
    }

    fn config_in(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.sources = vec!["alpha".into()];
        config.fetcher.request_delay_ms = 0;
        config.fetcher.limit = 2;
        config.ranking.top_n = 1;
        config.output.files = vec![tmp.path().join("dashboard/data.json")];
        config
    }

    #[tokio::test]
    async fn test_end_to_end_without_store() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(&tmp);
        let source = StaticSource(vec![
            RawItem {
                title: Some("first".into()),
                score: Some(10),
                num_comments: Some(5),
                ..RawItem::default()
            },
            RawItem {
                title: Some("second".into()),
                score: Some(1),
                num_comments: Some(1),
                ..RawItem::default()
            },
        ]);

        let summary = run_pipeline(&config, &source, None).await;

        let alpha = summary.output.get("alpha").unwrap();
        assert_eq!(alpha.len(), 1);
        assert_eq!(alpha[0].title, "first");
        assert_eq!(alpha[0].engagement, 15);

        assert_eq!(summary.report.written(), 1);
        assert_eq!(summary.report.skipped(), 1);
        assert!(summary.elapsed_ms() >= 0);

        let on_disk = read_output(&config.output.files[0]).await.unwrap().unwrap();
        assert_eq!(on_disk, summary.output);
    }

    #[tokio::test]
    async fn test_skip_when_every_source_failed() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_in(&tmp);
        config.output.skip_when_empty = true;

        let summary = run_pipeline(&config, &DownSource, None).await;

        assert!(summary.output.is_empty());
        assert_eq!(summary.failed_sources, vec!["alpha"]);
        assert!(summary.report.outcomes.is_empty());
        assert!(!config.output.files[0].exists());
    }

    #[tokio::test]
    async fn test_empty_listing_not_skipped() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_in(&tmp);
        config.output.skip_when_empty = true;

        // A successful fetch of an empty listing still counts as data
        let summary = run_pipeline(&config, &StaticSource(Vec::new()), None).await;

        assert!(summary.failed_sources.is_empty());
        assert_eq!(summary.report.written(), 1);
        let on_disk = read_output(&config.output.files[0]).await.unwrap().unwrap();
        assert_eq!(on_disk.get("alpha"), Some(&[][..]));
    }

    #[tokio::test]
    async fn test_empty_run_still_persisted_by_default() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(&tmp);

        let summary = run_pipeline(&config, &StaticSource(Vec::new()), None).await;

        assert_eq!(summary.report.written(), 1);
        let on_disk = read_output(&config.output.files[0]).await.unwrap().unwrap();
        assert_eq!(on_disk.get("alpha"), Some(&[][..]));
    }
}
