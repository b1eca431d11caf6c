//! In-memory blob store
//!
//! A [`BlobStore`] backend holding blobs in a map, for tests and local
//! development. Downloads are tracked by an in-flight gauge and can be
//! slowed down artificially so tests can observe the bulk concurrency
//! bound.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::Mutex;

use crate::error::{AzbucketError, Result};
use crate::store::{BlobStore, ByteChunks};

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Counts concurrently in-flight downloads and remembers the high-water mark
#[derive(Debug, Default)]
pub struct TransferGauge {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl TransferGauge {
    fn enter(&self) -> GaugeGuard<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        GaugeGuard(self)
    }

    /// Downloads in flight right now
    pub fn current(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Most downloads ever in flight at the same instant
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct GaugeGuard<'a>(&'a TransferGauge);

impl Drop for GaugeGuard<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// In-memory implementation of [`BlobStore`]
///
/// A `None` entry is a poisoned blob: it shows up in listings but every
/// download fails with not-found, which is how tests exercise partial
/// bulk-download failures.
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Option<Bytes>>>,
    gauge: Arc<TransferGauge>,
    download_delay: Option<Duration>,
    chunk_size: usize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            gauge: Arc::new(TransferGauge::default()),
            download_delay: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Hold every download open for `delay` so concurrent transfers overlap
    pub fn with_download_delay(mut self, delay: Duration) -> Self {
        self.download_delay = Some(delay);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Seed a blob directly, bypassing the upload path
    pub async fn insert(&self, name: impl Into<String>, content: impl Into<Bytes>) {
        self.blobs
            .lock()
            .await
            .insert(name.into(), Some(content.into()));
    }

    /// Make `name` appear in listings while every download of it fails
    pub async fn poison(&self, name: impl Into<String>) {
        self.blobs.lock().await.insert(name.into(), None);
    }

    /// Current content of a blob, if present and readable
    pub async fn contents(&self, name: &str) -> Option<Bytes> {
        self.blobs.lock().await.get(name).cloned().flatten()
    }

    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.lock().await.is_empty()
    }

    pub fn gauge(&self) -> Arc<TransferGauge> {
        Arc::clone(&self.gauge)
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, name: &str, content: Vec<u8>) -> Result<()> {
        self.blobs
            .lock()
            .await
            .insert(name.to_string(), Some(Bytes::from(content)));

        Ok(())
    }

    async fn download(&self, name: &str) -> Result<ByteChunks> {
        let data = match self.blobs.lock().await.get(name).cloned() {
            Some(Some(data)) => data,
            _ => return Err(AzbucketError::blob_not_found(name)),
        };

        // The gauge covers the simulated transfer window
        let _transfer = self.gauge.enter();
        if let Some(delay) = self.download_delay {
            tokio::time::sleep(delay).await;
        }

        let chunk_size = self.chunk_size;
        let chunks: Vec<Result<Bytes>> = (0..data.len())
            .step_by(chunk_size)
            .map(|start| {
                let end = usize::min(start + chunk_size, data.len());
                Ok(data.slice(start..end))
            })
            .collect();

        Ok(futures::stream::iter(chunks).boxed())
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.blobs.lock().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryBlobStore::new().with_chunk_size(4);
        store.upload("a/b.bin", b"hello world".to_vec()).await.unwrap();

        let chunks: Vec<Bytes> = store
            .download("a/b.bin")
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), b"hello world");
    }

    #[tokio::test]
    async fn test_missing_blob_is_not_found() {
        let store = MemoryBlobStore::new();
        let err = store.download("nope").await.err().unwrap();
        assert!(matches!(err, AzbucketError::BlobNotFound { .. }));
    }

    #[tokio::test]
    async fn test_poisoned_blob_listed_but_unreadable() {
        let store = MemoryBlobStore::new();
        store.poison("broken.jpg").await;

        assert_eq!(store.list().await.unwrap(), vec!["broken.jpg".to_string()]);
        assert!(store.download("broken.jpg").await.is_err());
    }
}
