//! Blob store abstraction
//!
//! A minimal capability interface over the storage backend so the transfer
//! components depend only on upload/download/list, with an Azure
//! implementation for production and an in-memory one for tests.

pub mod azure;
pub mod memory;

pub use azure::AzureBlobStore;
pub use memory::{MemoryBlobStore, TransferGauge};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::Result;

/// Sequential chunk stream of a blob's content
pub type ByteChunks = BoxStream<'static, Result<Bytes>>;

/// Capability interface over a blob container.
///
/// Uploads overwrite any existing blob of the same name. Listing
/// materializes the names currently visible, in whatever order the
/// backend yields them.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `content` under `name`, replacing any existing blob
    async fn upload(&self, name: &str, content: Vec<u8>) -> Result<()>;

    /// Stream the blob's content in sequential chunks
    async fn download(&self, name: &str) -> Result<ByteChunks>;

    /// Names of all blobs currently in the container
    async fn list(&self) -> Result<Vec<String>>;
}
