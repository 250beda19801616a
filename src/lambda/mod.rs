// src/lambda/mod.rs

//! AWS Lambda handler for scheduled collection runs.
//!
//! The function is invoked by a recurring schedule (EventBridge). Each
//! invocation:
//! 1. Builds configuration from defaults and environment variables
//! 2. Resolves the document store (service account, then ambient AWS credentials)
//! 3. Runs the shared collection pipeline

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::credentials;
use crate::error::Result;
use crate::models::{Config, RunSummary, SinkOutcome};
use crate::pipeline::run_pipeline;
use crate::services::ListingClient;
use crate::storage::{DocumentStore, S3DocumentStore};

/// Lambda invocation payload.
///
/// Scheduled events carry unrelated fields which are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CollectRequest {
    /// Sources to collect instead of the configured ones
    #[serde(default)]
    pub sources: Option<Vec<String>>,

    /// Items kept per source instead of the configured count
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Lambda response payload.
#[derive(Debug, Default, Serialize)]
pub struct CollectResponse {
    /// Whether the run completed
    pub success: bool,

    /// Number of sources processed
    pub sources: usize,

    /// Number of ranked items across all sources
    pub total_items: usize,

    /// Sources whose fetch failed
    pub failed_sources: Vec<String>,

    /// Per-destination outcomes
    pub destinations: Vec<(String, SinkOutcome)>,

    /// Error message if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

impl From<RunSummary> for CollectResponse {
    fn from(summary: RunSummary) -> Self {
        Self {
            success: true,
            sources: summary.output.source_count(),
            total_items: summary.output.item_count(),
            execution_time_ms: summary.elapsed_ms().max(0) as u64,
            failed_sources: summary.failed_sources,
            destinations: summary.report.outcomes,
            error: None,
        }
    }
}

/// Main Lambda handler function.
#[instrument(skip(event))]
pub async fn handler(
    event: LambdaEvent<CollectRequest>,
) -> std::result::Result<CollectResponse, LambdaError> {
    let start = std::time::Instant::now();
    let (request, _context) = event.into_parts();

    info!(
        "Starting collection: sources={:?}, top_n={:?}",
        request.sources, request.top_n
    );

    match run_collect(&request).await {
        Ok(response) => {
            info!(
                "Collection completed: {} items from {} sources in {}ms",
                response.total_items, response.sources, response.execution_time_ms
            );
            Ok(response)
        }
        Err(e) => {
            error!("Collection failed: {}", e);
            Ok(CollectResponse {
                success: false,
                error: Some(e.to_string()),
                execution_time_ms: start.elapsed().as_millis() as u64,
                ..Default::default()
            })
        }
    }
}

/// Internal collection logic.
async fn run_collect(request: &CollectRequest) -> Result<CollectResponse> {
    let mut config = load_lambda_config(|key| std::env::var(key).ok());
    apply_request(&mut config, request);
    config.validate()?;

    let store = resolve_store(&config).await;
    let client = ListingClient::new(&config.fetcher)?;

    let summary = run_pipeline(
        &config,
        &client,
        store.as_ref().map(|s| s as &dyn DocumentStore),
    )
    .await;

    Ok(summary.into())
}

/// Load configuration suitable for the Lambda environment.
///
/// Lambda has no writable project directory, so only the document store is
/// written, and empty runs are not persisted.
pub fn load_lambda_config<F>(lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();
    config.output.files.clear();
    config.output.skip_when_empty = true;
    config.fetcher.user_agent =
        "Mozilla/5.0 (AWS Lambda; Forum Pulse Bot) AppleWebKit/537.36 (KHTML, like Gecko)"
            .to_string();
    config.apply_env_overrides(lookup);
    config
}

/// Apply per-invocation overrides from the payload.
fn apply_request(config: &mut Config, request: &CollectRequest) {
    if let Some(sources) = request.sources.as_ref().filter(|s| !s.is_empty()) {
        config.sources = sources.clone();
    }
    if let Some(top_n) = request.top_n {
        config.ranking.top_n = top_n;
    }
}

/// Service account first, ambient AWS credentials second.
async fn resolve_store(config: &Config) -> Option<S3DocumentStore> {
    if let Some((account, source)) =
        credentials::resolve(&config.credentials, |key| std::env::var(key).ok())
    {
        info!("Document store credentials from {:?}", source);
        return Some(S3DocumentStore::from_service_account(&account));
    }

    let store = S3DocumentStore::from_env().await;
    if store.is_none() {
        info!("DOCUMENT_BUCKET unset, no document store configured");
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_request_defaults() {
        let req: CollectRequest = serde_json::from_str("{}").unwrap();
        assert!(req.sources.is_none());
        assert!(req.top_n.is_none());
    }

    #[test]
    fn test_scheduled_event_payload_is_accepted() {
        let json = r#"{
            "version": "0",
            "id": "53dc4d37-cffa-4f76-80c9-8b7d4a4d2eaa",
            "detail-type": "Scheduled Event",
            "source": "aws.events",
            "time": "2026-10-18T06:00:00Z",
            "resources": ["arn:aws:events:us-east-1:123456789012:rule/every-6-hours"],
            "detail": {}
        }"#;
        let req: CollectRequest = serde_json::from_str(json).unwrap();
        assert!(req.sources.is_none());
    }

    #[test]
    fn test_request_overrides() {
        let mut config = Config::default();
        let req: CollectRequest =
            serde_json::from_str(r#"{"sources": ["rust"], "top_n": 3}"#).unwrap();
        apply_request(&mut config, &req);
        assert_eq!(config.sources, vec!["rust"]);
        assert_eq!(config.ranking.top_n, 3);

        let mut config = Config::default();
        apply_request(
            &mut config,
            &CollectRequest {
                sources: Some(Vec::new()),
                top_n: None,
            },
        );
        assert_eq!(config.sources, vec!["n8n", "automation"]);
    }

    #[test]
    fn test_lambda_config() {
        let config = load_lambda_config(|key| match key {
            "TOP_N" => Some("7".to_string()),
            _ => None,
        });
        assert!(config.output.files.is_empty());
        assert!(config.output.skip_when_empty);
        assert_eq!(config.ranking.top_n, 7);
        assert_eq!(config.destinations().len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_response_serialization() {
        let response = CollectResponse {
            success: true,
            sources: 2,
            total_items: 10,
            ..Default::default()
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["total_items"], 10);
        assert_eq!(value["failed_sources"], serde_json::json!([]));
        assert!(value.get("error").is_none());
    }
}
