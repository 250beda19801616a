// src/services/listing.rs

//! Listing client for forum "new items" endpoints.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::{AppError, Result};
use crate::models::{FetcherConfig, Listing, RawItem};
use crate::utils::http::{create_async_client, listing_url};

/// A source of recently posted items.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Single-attempt fetch of up to `limit` new items of `source_id`.
    async fn try_fetch(&self, source_id: &str, limit: u32) -> Result<Vec<RawItem>>;

    /// Like [`try_fetch`](Self::try_fetch), but failures are logged and
    /// yield an empty list.
    async fn fetch(&self, source_id: &str, limit: u32) -> Vec<RawItem> {
        match self.try_fetch(source_id, limit).await {
            Ok(items) => {
                log::debug!("Fetched {} items from r/{}", items.len(), source_id);
                items
            }
            Err(e) => {
                log_fetch_error(source_id, &e);
                Vec::new()
            }
        }
    }
}

/// Log a failed fetch, naming the source and the status or cause.
pub fn log_fetch_error(source_id: &str, error: &AppError) {
    match error {
        AppError::Status { status, .. } => {
            log::error!("Error fetching r/{}: {}", source_id, status)
        }
        e => log::error!("Exception fetching r/{}: {}", source_id, e),
    }
}

/// Client for the `/r/{source}/new.json` listing API.
pub struct ListingClient {
    client: Client,
    base_url: String,
}

impl ListingClient {
    /// Create a listing client with its own HTTP client.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self::with_client(
            create_async_client(config)?,
            config.base_url.clone(),
        ))
    }

    /// Create a listing client reusing an existing HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ListingSource for ListingClient {
    async fn try_fetch(&self, source_id: &str, limit: u32) -> Result<Vec<RawItem>> {
        let url = listing_url(&self.base_url, source_id, limit)?;
        let response = self.client.get(url.clone()).send().await?;

        if response.status() != StatusCode::OK {
            return Err(AppError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let listing: Listing = serde_json::from_str(&body)?;
        Ok(listing.into_items())
    }
}
