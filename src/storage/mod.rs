//! Storage abstractions for run output persistence.
//!
//! Every run produces one [`RunOutput`](crate::models::RunOutput) which is
//! written in full to each configured destination:
//!
//! ```text
//! .tmp/reddit_top_posts.json          # LocalFile
//! dashboard/data.json                 # LocalFile
//! {bucket}/{prefix}/dashboard_data/latest.json   # DocumentStore (S3)
//! ```
//!
//! Nothing is merged with earlier runs; each write fully replaces the
//! previous content.

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

// Re-export for convenience
pub use local::{read_output, write_json_file};
#[cfg(feature = "s3")]
pub use s3::S3DocumentStore;

/// A place the run output is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// JSON file on the local filesystem
    LocalFile(PathBuf),
    /// Single document in a remote document store
    DocumentStore {
        collection: String,
        document_id: String,
    },
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::LocalFile(path) => write!(f, "file:{}", path.display()),
            Destination::DocumentStore {
                collection,
                document_id,
            } => write!(f, "store:{}/{}", collection, document_id),
        }
    }
}

/// Trait for document store backends.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Replace the whole document at `collection/document_id` with `body`.
    ///
    /// Returns a human-readable location of the written document.
    async fn replace_document(
        &self,
        collection: &str,
        document_id: &str,
        body: &Value,
    ) -> Result<String>;
}
