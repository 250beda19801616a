// src/credentials.rs

//! Service account resolution for the document store.
//!
//! Lookup order:
//! 1. Service account JSON in the configured environment variable
//! 2. The configured credentials file
//!
//! When neither is present, or the one found cannot be parsed, no account is
//! returned and the document store sink is disabled for the run.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::CredentialsConfig;

/// Static credentials and coordinates of the document store bucket.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceAccount {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
    pub region: String,
    pub bucket: String,
    /// Key prefix inside the bucket
    #[serde(default)]
    pub prefix: String,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl ServiceAccount {
    /// Parse a service account from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let account: Self = serde_json::from_str(json)?;
        if account.access_key_id.is_empty() || account.secret_access_key.is_empty() {
            return Err(AppError::credentials("service account has empty keys"));
        }
        if account.bucket.is_empty() {
            return Err(AppError::credentials("service account has no bucket"));
        }
        Ok(account)
    }

    /// Read and parse a service account file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Where a resolved account came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Env(String),
    File(String),
}

/// Resolve the service account, degrading to `None` on absence or failure.
pub fn resolve<F>(config: &CredentialsConfig, lookup: F) -> Option<(ServiceAccount, CredentialSource)>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(json) = lookup(config.env_var.as_str()).filter(|v| !v.trim().is_empty()) {
        log::info!("Using service account from environment variable {}", config.env_var);
        return match ServiceAccount::from_json(&json) {
            Ok(account) => Some((account, CredentialSource::Env(config.env_var.clone()))),
            Err(e) => {
                log::error!("Failed to load service account from {}: {}", config.env_var, e);
                None
            }
        };
    }

    if !config.file.exists() {
        log::info!(
            "No service account found ({} unset, {} missing)",
            config.env_var,
            config.file.display()
        );
        return None;
    }

    log::info!("Using service account from file: {}", config.file.display());
    match ServiceAccount::from_file(&config.file) {
        Ok(account) => Some((
            account,
            CredentialSource::File(config.file.display().to_string()),
        )),
        Err(e) => {
            log::error!(
                "Failed to load service account from {}: {}",
                config.file.display(),
                e
            );
            None
        }
    }
}
