//! Configuration settings management
//!
//! All settings come from the process environment, loaded once at startup
//! and passed by reference into every component. There are no ambient
//! globals; tests construct a `Config` directly.

use crate::error::{AzbucketError, Result};
use serde::{Deserialize, Serialize};

/// Default root directory for single-blob downloads
pub const DEFAULT_DOWNLOAD_ROOT: &str = "downloads";

/// Default number of concurrent transfers during a bulk download
pub const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the storage account, used only to build return URLs
    pub account_url: String,
    /// Credential + endpoint bundle for all blob client construction
    pub connection_string: String,
    /// The single container all operations target
    pub container_name: String,
    /// Root directory for single-blob downloads
    pub download_root: String,
    /// Fixed concurrency bound for bulk downloads
    pub max_concurrent_downloads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_url: String::new(),
            connection_string: String::new(),
            container_name: String::new(),
            download_root: DEFAULT_DOWNLOAD_ROOT.to_string(),
            max_concurrent_downloads: DEFAULT_MAX_CONCURRENT_DOWNLOADS,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the environment.
    ///
    /// Reads `ACCOUNT_URL`, `CONNECTION_STRING` and `CONTAINER_NAME`
    /// (required), plus optional `DOWNLOAD_ROOT` and
    /// `MAX_CONCURRENT_DOWNLOADS` overrides.
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.account_url.is_empty() {
            return Err(AzbucketError::config("ACCOUNT_URL is required"));
        }

        if self.connection_string.is_empty() {
            return Err(AzbucketError::config("CONNECTION_STRING is required"));
        }

        if self.container_name.is_empty() {
            return Err(AzbucketError::config("CONTAINER_NAME is required"));
        }

        if self.max_concurrent_downloads == 0 {
            return Err(AzbucketError::config(
                "MAX_CONCURRENT_DOWNLOADS must be at least 1",
            ));
        }

        Ok(())
    }

    /// Externally-visible base path for uploaded objects:
    /// `ACCOUNT_URL/CONTAINER_NAME`
    pub fn base_path(&self) -> String {
        format!(
            "{}/{}",
            self.account_url.trim_end_matches('/'),
            self.container_name
        )
    }
}
