//! Azure Blob Storage backend
//!
//! Connection-string-authenticated implementation of [`BlobStore`] over a
//! single container client, using the azure_storage_blobs crate.

use async_trait::async_trait;
use azure_storage::ConnectionString;
use azure_storage_blobs::prelude::*;
use futures::{StreamExt, TryStreamExt};

use crate::error::{AzbucketError, Result};
use crate::store::{BlobStore, ByteChunks};

/// Range size for chunked downloads
const DOWNLOAD_CHUNK_SIZE: u64 = 1024 * 1024;

/// Azure Blob Storage implementation of [`BlobStore`]
pub struct AzureBlobStore {
    container: ContainerClient,
}

impl AzureBlobStore {
    /// Build a store for `container_name` from an Azure connection string.
    pub fn from_connection_string(connection_string: &str, container_name: &str) -> Result<Self> {
        let parsed = ConnectionString::new(connection_string)
            .map_err(|e| AzbucketError::config(format!("Invalid connection string: {e}")))?;

        let account = parsed.account_name.ok_or_else(|| {
            AzbucketError::config("Connection string does not name a storage account")
        })?;

        let credentials = parsed
            .storage_credentials()
            .map_err(|e| AzbucketError::config(format!("Invalid storage credentials: {e}")))?;

        let service = BlobServiceClient::new(account, credentials);

        Ok(Self {
            container: service.container_client(container_name),
        })
    }

    /// Get the container name
    pub fn container_name(&self) -> &str {
        self.container.container_name()
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn upload(&self, name: &str, content: Vec<u8>) -> Result<()> {
        self.container
            .blob_client(name)
            .put_block_blob(content)
            .await
            .map_err(|e| AzbucketError::azure_api(format!("Failed to upload blob '{name}': {e}")))?;

        Ok(())
    }

    async fn download(&self, name: &str) -> Result<ByteChunks> {
        let blob_client = self.container.blob_client(name);

        // Check if blob exists and get its size before attempting download
        let properties = blob_client.get_properties().await.map_err(|e| {
            let error_msg = e.to_string().to_lowercase();
            if error_msg.contains("404") || error_msg.contains("not found") {
                AzbucketError::blob_not_found(name)
            } else {
                AzbucketError::azure_api(format!("Failed to check if blob exists: {e}"))
            }
        })?;

        // Range reads of 0-byte blobs fail with HTTP 416, hand back an
        // empty stream instead
        if properties.blob.properties.content_length == 0 {
            return Ok(futures::stream::empty().boxed());
        }

        let pages = blob_client
            .get()
            .chunk_size(DOWNLOAD_CHUNK_SIZE)
            .into_stream();

        Ok(pages
            .map_err(AzbucketError::from)
            .map_ok(|chunk| chunk.data.map_err(AzbucketError::from))
            .try_flatten()
            .boxed())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut stream = self.container.list_blobs().into_stream();
        let mut names = Vec::new();

        // Collect every page the enumeration yields
        while let Some(page) = stream
            .try_next()
            .await
            .map_err(|e| AzbucketError::azure_api(format!("Failed to list blobs: {e}")))?
        {
            for blob in page.blobs.blobs() {
                names.push(blob.name.clone());
            }
        }

        Ok(names)
    }
}
