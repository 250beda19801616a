//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::storage::Destination;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Communities to collect, processed in this order
    #[serde(default = "defaults::sources")]
    pub sources: Vec<String>,

    /// HTTP and listing behavior settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Ranking settings
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Where results are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Where document store credentials are looked up
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.limit == 0 {
            return Err(AppError::validation("fetcher.limit must be > 0"));
        }
        if self.fetcher.timeout_secs == Some(0) {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.fetcher.base_url)?;
        if self.ranking.top_n == 0 {
            return Err(AppError::validation("ranking.top_n must be > 0"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }

        let name_pattern = Regex::new(r"^[A-Za-z0-9_]{2,21}$")
            .map_err(|e| AppError::config(e.to_string()))?;
        if let Some(bad) = self.sources.iter().find(|s| !name_pattern.is_match(s)) {
            return Err(AppError::validation(format!("Invalid source name '{bad}'")));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.sources.iter().find(|s| !seen.insert(*s)) {
            return Err(AppError::validation(format!("Duplicate source '{dup}'")));
        }

        if self.destinations().is_empty() {
            return Err(AppError::validation("No output destinations defined"));
        }
        Ok(())
    }

    /// Destinations in write order: local files first, then the document store.
    pub fn destinations(&self) -> Vec<Destination> {
        let mut destinations: Vec<Destination> = self
            .output
            .files
            .iter()
            .cloned()
            .map(Destination::LocalFile)
            .collect();

        let doc = &self.output.document;
        if doc.enabled {
            destinations.push(Destination::DocumentStore {
                collection: doc.collection.clone(),
                document_id: doc.document_id.clone(),
            });
        }
        destinations
    }

    /// Override settings from environment-style lookups.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(sources) = lookup("FORUM_SOURCES") {
            let parsed = split_list(&sources);
            if !parsed.is_empty() {
                self.sources = parsed;
            }
        }

        if let Some(limit) = parse_var(&lookup, "FETCH_LIMIT") {
            self.fetcher.limit = limit;
        }
        if let Some(top_n) = parse_var(&lookup, "TOP_N") {
            self.ranking.top_n = top_n;
        }
        if let Some(ms) = parse_var(&lookup, "REQUEST_DELAY_MS") {
            self.fetcher.request_delay_ms = ms;
        }
        if let Some(secs) = parse_var(&lookup, "HTTP_TIMEOUT_SECS") {
            self.fetcher.timeout_secs = Some(secs);
        }

        if let Some(collection) = lookup("DOCUMENT_COLLECTION") {
            self.output.document.collection = collection;
        }
        if let Some(document_id) = lookup("DOCUMENT_ID") {
            self.output.document.document_id = document_id;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: defaults::sources(),
            fetcher: FetcherConfig::default(),
            ranking: RankingConfig::default(),
            output: OutputConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

/// Split a comma separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}

/// HTTP client and listing behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Forum host serving `/r/{source}/new.json`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Prefix prepended to relative permalinks
    #[serde(default = "defaults::permalink_base")]
    pub permalink_base: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Number of new items requested per source
    #[serde(default = "defaults::limit")]
    pub limit: u32,

    /// Delay after each source in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Request timeout in seconds; transport default when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl FetcherConfig {
    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            permalink_base: defaults::permalink_base(),
            user_agent: defaults::user_agent(),
            limit: defaults::limit(),
            request_delay_ms: defaults::request_delay(),
            timeout_secs: None,
        }
    }
}

/// Ranking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Items kept per source
    #[serde(default = "defaults::top_n")]
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: defaults::top_n(),
        }
    }
}

/// Output destinations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON files rewritten on every run
    #[serde(default = "defaults::files")]
    pub files: Vec<PathBuf>,

    /// Document written to the document store
    #[serde(default)]
    pub document: DocumentTarget,

    /// Skip persistence entirely when no source was fetched successfully
    #[serde(default)]
    pub skip_when_empty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            files: defaults::files(),
            document: DocumentTarget::default(),
            skip_when_empty: false,
        }
    }
}

/// Coordinates of the stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTarget {
    /// Set to false to never write the document
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    #[serde(default = "defaults::collection")]
    pub collection: String,

    #[serde(default = "defaults::document_id")]
    pub document_id: String,
}

impl Default for DocumentTarget {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            collection: defaults::collection(),
            document_id: defaults::document_id(),
        }
    }
}

/// Credential lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Environment variable holding the service account JSON
    #[serde(default = "defaults::credentials_env_var")]
    pub env_var: String,

    /// Fallback service account file
    #[serde(default = "defaults::credentials_file")]
    pub file: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            env_var: defaults::credentials_env_var(),
            file: defaults::credentials_file(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn sources() -> Vec<String> {
        vec!["n8n".into(), "automation".into()]
    }

    // Fetcher defaults
    pub fn base_url() -> String {
        "https://www.reddit.com".into()
    }
    pub fn permalink_base() -> String {
        "https://reddit.com".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36"
            .into()
    }
    pub fn limit() -> u32 {
        100
    }
    pub fn request_delay() -> u64 {
        1000
    }

    pub fn top_n() -> usize {
        5
    }

    // Output defaults
    pub fn files() -> Vec<PathBuf> {
        vec![
            PathBuf::from(".tmp/reddit_top_posts.json"),
            PathBuf::from("dashboard/data.json"),
        ]
    }
    pub fn enabled() -> bool {
        true
    }
    pub fn collection() -> String {
        "dashboard_data".into()
    }
    pub fn document_id() -> String {
        "latest".into()
    }

    pub fn credentials_env_var() -> String {
        "SERVICE_ACCOUNT_JSON".into()
    }
    pub fn credentials_file() -> PathBuf {
        PathBuf::from("credentials.json")
    }
}
