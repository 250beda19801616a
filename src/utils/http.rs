// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::models::FetcherConfig;

/// Create a configured asynchronous HTTP client.
///
/// The timeout is only set when configured; otherwise the transport default applies.
pub fn create_async_client(config: &FetcherConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Build the "new items" listing URL for a source.
pub fn listing_url(base_url: &str, source_id: &str, limit: u32) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(["r", source_id, "new.json"]);
    url.query_pairs_mut()
        .append_pair("limit", &limit.to_string());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url() {
        let url = listing_url("https://www.reddit.com", "n8n", 100).unwrap();
        assert_eq!(url.as_str(), "https://www.reddit.com/r/n8n/new.json?limit=100");
    }

    #[test]
    fn test_listing_url_with_trailing_slash() {
        let url = listing_url("http://127.0.0.1:1234/", "automation", 5).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:1234/r/automation/new.json?limit=5");
    }

    #[test]
    fn test_listing_url_rejects_garbage() {
        assert!(listing_url("not a url", "n8n", 1).is_err());
        assert!(listing_url("mailto:someone@example.com", "n8n", 1).is_err());
    }

    #[test]
    fn test_create_client() {
        let mut config = FetcherConfig::default();
        assert!(create_async_client(&config).is_ok());
        config.timeout_secs = Some(10);
        assert!(create_async_client(&config).is_ok());
    }
}
