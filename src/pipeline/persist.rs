// src/pipeline/persist.rs

//! Best-effort persistence of a run output to every destination.

use crate::models::{PersistReport, RunOutput, SinkOutcome};
use crate::storage::{Destination, DocumentStore, write_json_file};

/// Write `output` to each destination independently.
///
/// A failing destination is logged and recorded; the remaining destinations
/// are still attempted. Document store destinations are skipped when no
/// store handle is available.
pub async fn persist(
    output: &RunOutput,
    destinations: &[Destination],
    store: Option<&dyn DocumentStore>,
) -> PersistReport {
    let mut report = PersistReport::default();

    for destination in destinations {
        let outcome = match destination {
            Destination::LocalFile(path) => match write_json_file(path, output).await {
                Ok(()) => {
                    log::info!("Saved results to {}", path.display());
                    SinkOutcome::Written {
                        location: path.display().to_string(),
                    }
                }
                Err(e) => {
                    log::error!("Failed to write {}: {}", path.display(), e);
                    SinkOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            },
            Destination::DocumentStore {
                collection,
                document_id,
            } => match store {
                None => {
                    log::warn!(
                        "No document store available, skipping upload of {}/{}",
                        collection,
                        document_id
                    );
                    SinkOutcome::Skipped {
                        reason: "document store unavailable".to_string(),
                    }
                }
                Some(store) => {
                    log::info!("Uploading data to document store...");
                    let result = match serde_json::to_value(output) {
                        Ok(body) => store.replace_document(collection, document_id, &body).await,
                        Err(e) => Err(e.into()),
                    };
                    match result {
                        Ok(location) => {
                            log::info!("Successfully uploaded data to {}", location);
                            SinkOutcome::Written { location }
                        }
                        Err(e) => {
                            log::error!("Failed to upload to document store: {}", e);
                            SinkOutcome::Failed {
                                error: e.to_string(),
                            }
                        }
                    }
                }
            },
        };
        report.record(destination.to_string(), outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{Mutex, Once};
    use std::thread::{self, ThreadId};

    use async_trait::async_trait;
    use serde_json::Value;
    use tempfile::TempDir;

    use super::*;
    use crate::credentials;
    use crate::error::{AppError, Result};
    use crate::models::{CredentialsConfig, NormalizedItem};
    use crate::storage::read_output;

    /// Records every log line together with the thread that emitted it.
    struct CaptureLogger;

    static CAPTURED: Mutex<Vec<(ThreadId, log::Level, String)>> = Mutex::new(Vec::new());
    static LOGGER: CaptureLogger = CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            CAPTURED.lock().unwrap().push((
                thread::current().id(),
                record.level(),
                record.args().to_string(),
            ));
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Trace);
        });
        let me = thread::current().id();
        CAPTURED.lock().unwrap().retain(|(id, _, _)| *id != me);
    }

    /// Lines logged by the current thread that announce a skipped upload.
    fn skip_notices() -> Vec<String> {
        let me = thread::current().id();
        CAPTURED
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _, msg)| *id == me && msg.to_lowercase().contains("skip"))
            .map(|(_, level, msg)| format!("{level} {msg}"))
            .collect()
    }

    /// Keeps every replaced document in memory.
    #[derive(Default)]
    struct MemoryStore {
        documents: Mutex<Vec<(String, String, Value)>>,
        fail: bool,
    }

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn replace_document(
            &self,
            collection: &str,
            document_id: &str,
            body: &Value,
        ) -> Result<String> {
            if self.fail {
                return Err(AppError::store("memory", "unavailable"));
            }
            self.documents.lock().unwrap().push((
                collection.to_string(),
                document_id.to_string(),
                body.clone(),
            ));
            Ok(format!("memory://{}/{}", collection, document_id))
        }
    }

    fn sample_output() -> RunOutput {
        let mut output = RunOutput::new();
        output.insert(
            "alpha",
            vec![NormalizedItem {
                source_id: "alpha".into(),
                title: "Top post".into(),
                url: "https://example.com/top".into(),
                score: 10,
                num_comments: 5,
                created_utc: 1_700_000_000.0,
                engagement: 15,
                permalink: "https://reddit.com/r/alpha/comments/1/top/".into(),
            }],
        );
        output
    }

    fn document() -> Destination {
        Destination::DocumentStore {
            collection: "dashboard_data".into(),
            document_id: "latest".into(),
        }
    }

    #[tokio::test]
    async fn test_no_store_writes_file_and_skips_once() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dashboard/data.json");
        let output = sample_output();

        let report = persist(
            &output,
            &[Destination::LocalFile(path.clone()), document()],
            None,
        )
        .await;

        assert_eq!(report.written(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 0);
        assert_eq!(read_output(&path).await.unwrap().unwrap(), output);
    }

    #[tokio::test]
    async fn test_missing_credentials_log_one_skip_notice() {
        capture_logs();
        let tmp = TempDir::new().unwrap();
        let config = CredentialsConfig {
            env_var: "PULSE_UNSET_ACCOUNT".into(),
            file: tmp.path().join("credentials.json"),
        };

        let account = credentials::resolve(&config, |_| None);
        assert!(account.is_none());

        let report = persist(
            &sample_output(),
            &[Destination::LocalFile(tmp.path().join("data.json")), document()],
            None,
        )
        .await;

        assert_eq!(report.skipped(), 1);
        let notices = skip_notices();
        assert_eq!(notices.len(), 1, "{notices:?}");
        assert!(notices[0].starts_with("WARN"));
    }

    #[tokio::test]
    async fn test_store_receives_full_document() {
        let store = MemoryStore::default();
        let output = sample_output();

        let report = persist(&output, &[document()], Some(&store as &dyn DocumentStore)).await;

        assert_eq!(report.written(), 1);
        let documents = store.documents.lock().unwrap();
        assert_eq!(documents.len(), 1);
        let (collection, document_id, body) = &documents[0];
        assert_eq!(collection, "dashboard_data");
        assert_eq!(document_id, "latest");
        assert_eq!(body, &serde_json::to_value(&output).unwrap());
        assert_eq!(body["alpha"][0]["engagement"], 15);
    }

    #[tokio::test]
    async fn test_file_failure_does_not_block_store() {
        let tmp = TempDir::new().unwrap();
        // A regular file where a directory is needed makes the write fail
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let bad_path = blocker.join("data.json");
        let good_path = tmp.path().join("ok/data.json");
        let store = MemoryStore::default();

        let report = persist(
            &sample_output(),
            &[
                Destination::LocalFile(bad_path),
                document(),
                Destination::LocalFile(good_path.clone()),
            ],
            Some(&store as &dyn DocumentStore),
        )
        .await;

        assert_eq!(report.failed(), 1);
        assert_eq!(report.written(), 2);
        assert!(good_path.exists());
        assert_eq!(store.documents.lock().unwrap().len(), 1);
        assert!(matches!(report.outcomes[0].1, SinkOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_store_failure_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        let store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };

        let report = persist(
            &sample_output(),
            &[document(), Destination::LocalFile(path.clone())],
            Some(&store as &dyn DocumentStore),
        )
        .await;

        assert_eq!(report.failed(), 1);
        assert_eq!(report.written(), 1);
        assert!(path.exists());
        assert_eq!(report.outcomes[0].0, "store:dashboard_data/latest");
    }

    #[tokio::test]
    async fn test_every_file_fully_replaced() {
        let tmp = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = ["a/top.json", "b/data.json"]
            .iter()
            .map(|p| tmp.path().join(p))
            .collect();
        std::fs::create_dir_all(tmp.path().join("a")).unwrap();
        std::fs::write(&paths[0], r#"{"stale": []}"#).unwrap();

        let destinations: Vec<_> = paths.iter().cloned().map(Destination::LocalFile).collect();
        persist(&sample_output(), &destinations, None).await;

        for path in &paths {
            let loaded = read_output(path).await.unwrap().unwrap();
            assert!(loaded.get("stale").is_none());
            assert_eq!(loaded.item_count(), 1);
        }
    }
}
