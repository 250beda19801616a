//! AWS S3 document store implementation.
//!
//! Each document is a single JSON object stored at
//! `{bucket}/{prefix}/{collection}/{document_id}.json` and replaced in full
//! on every write.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use serde_json::Value;

use crate::credentials::ServiceAccount;
use crate::error::{AppError, Result};
use crate::storage::DocumentStore;

/// S3-backed document store.
#[derive(Clone)]
pub struct S3DocumentStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3DocumentStore {
    /// Create a new S3 document store.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Build a store from static service account credentials.
    pub fn from_service_account(account: &ServiceAccount) -> Self {
        let credentials = Credentials::new(
            account.access_key_id.clone(),
            account.secret_access_key.clone(),
            account.session_token.clone(),
            None,
            "service-account",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(account.region.clone()))
            .credentials_provider(credentials)
            .build();

        Self::new(
            Client::from_conf(config),
            account.bucket.clone(),
            account.prefix.clone(),
        )
    }

    /// Create a store from ambient AWS configuration.
    ///
    /// Returns None when `DOCUMENT_BUCKET` is unset.
    pub async fn from_env() -> Option<Self> {
        let bucket = std::env::var("DOCUMENT_BUCKET").ok()?;
        let prefix = std::env::var("DOCUMENT_PREFIX").unwrap_or_default();

        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Some(Self::new(Client::new(&config), bucket, prefix))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key for a document.
    pub fn document_key(&self, collection: &str, document_id: &str) -> String {
        document_key(&self.prefix, collection, document_id)
    }
}

fn document_key(prefix: &str, collection: &str, document_id: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{}/{}.json", collection, document_id)
    } else {
        format!("{}/{}/{}.json", prefix, collection, document_id)
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn replace_document(
        &self,
        collection: &str,
        document_id: &str,
        body: &Value,
    ) -> Result<String> {
        let key = self.document_key(collection, document_id);
        let location = format!("s3://{}/{}", self.bucket, key);
        let json = serde_json::to_vec_pretty(body)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(json))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| AppError::store(&location, e.into_service_error()))?;

        log::info!("Wrote document to {}", location);
        Ok(location)
    }
}
