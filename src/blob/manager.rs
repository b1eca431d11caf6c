//! Core transfer manager for single-object operations
//!
//! This module provides the main `TransferManager` struct and the basic
//! operations: upload from a local file or base64 payload, single-blob
//! download, and container listing. The concurrent bulk download lives in
//! [`crate::blob::bulk`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures::TryStreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::blob::models::UploadOutcome;
use crate::config::Config;
use crate::error::{AzbucketError, Result};
use crate::store::{AzureBlobStore, BlobStore};

/// Core transfer manager
pub struct TransferManager {
    store: Arc<dyn BlobStore>,
    base_url: String,
    download_root: PathBuf,
    max_concurrent: usize,
}

impl TransferManager {
    /// Create a new TransferManager instance
    pub fn new(
        store: Arc<dyn BlobStore>,
        base_url: String,
        download_root: PathBuf,
        max_concurrent: usize,
    ) -> Self {
        Self {
            store,
            base_url,
            download_root,
            max_concurrent,
        }
    }

    /// Replace the bulk-download concurrency bound
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Upload a local file to blob storage.
    ///
    /// Reads the whole file and issues a single overwrite-upload. The
    /// `content_type` hint is accepted for interface compatibility but is
    /// not sent to the store.
    pub async fn upload_file(
        &self,
        file_path: &Path,
        blob_name: &str,
        content_type: Option<&str>,
    ) -> Result<UploadOutcome> {
        if blob_name.trim().is_empty() {
            return Err(AzbucketError::invalid_argument("Blob name cannot be empty"));
        }

        if let Some(hint) = content_type {
            debug!(%hint, "ignoring content-type hint");
        }

        let content = tokio::fs::read(file_path).await.map_err(|e| {
            AzbucketError::local_file(format!("Failed to read file {}: {e}", file_path.display()))
        })?;

        info!(blob = %blob_name, bytes = content.len(), "uploading file");
        self.store.upload(blob_name, content).await?;

        Ok(UploadOutcome {
            success: true,
            url: self.blob_url(blob_name),
        })
    }

    /// Upload a base64-encoded payload to blob storage.
    ///
    /// Decodes the payload first; malformed base64 fails with
    /// [`AzbucketError::Base64Error`] before any store call is made.
    pub async fn upload_base64(&self, blob_name: &str, payload: &str) -> Result<UploadOutcome> {
        if blob_name.trim().is_empty() {
            return Err(AzbucketError::invalid_argument("Blob name cannot be empty"));
        }

        let content = BASE64.decode(payload.trim())?;

        info!(blob = %blob_name, bytes = content.len(), "uploading decoded payload");
        self.store.upload(blob_name, content).await?;

        Ok(UploadOutcome {
            success: true,
            url: self.blob_url(blob_name),
        })
    }

    /// Download a single blob to `download_root/group_id/blob_name`.
    ///
    /// The destination directory must already exist: unlike the bulk path,
    /// this operation does not create intermediate directories, and a
    /// missing directory is a fatal filesystem error.
    pub async fn download_file(&self, group_id: &str, blob_name: &str) -> Result<PathBuf> {
        if blob_name.trim().is_empty() {
            return Err(AzbucketError::invalid_argument("Blob name cannot be empty"));
        }

        let output = self.download_root.join(group_id).join(blob_name);

        let mut file = tokio::fs::File::create(&output).await.map_err(|e| {
            AzbucketError::local_file(format!("Failed to create {}: {e}", output.display()))
        })?;

        let mut chunks = self.store.download(blob_name).await?;
        while let Some(chunk) = chunks.try_next().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        info!(blob = %blob_name, path = %output.display(), "downloaded blob");
        Ok(output)
    }

    /// Names of all blobs currently in the container, in store order
    pub async fn list_blobs(&self) -> Result<Vec<String>> {
        self.store.list().await
    }

    /// Externally-visible URL for a blob name
    pub fn blob_url(&self, blob_name: &str) -> String {
        format!("{}/{}", self.base_url, blob_name)
    }

    pub(crate) fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    pub(crate) fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

/// Helper function to create a TransferManager from configuration
pub fn create_transfer_manager(config: &Config) -> Result<TransferManager> {
    config.validate()?;

    let store = Arc::new(AzureBlobStore::from_connection_string(
        &config.connection_string,
        &config.container_name,
    )?);

    Ok(TransferManager::new(
        store,
        config.base_path(),
        PathBuf::from(&config.download_root),
        config.max_concurrent_downloads,
    ))
}
