//! Bulk container download
//!
//! Replicates every blob currently in the container into a local directory
//! tree, preserving each blob's name as its relative path. One listing call
//! materializes the work list, then one download-and-write task runs per
//! blob under a fixed concurrency bound. A failing blob neither cancels nor
//! rolls back its siblings; every blob's outcome is collected instead of
//! surfacing only the first failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{Stream, StreamExt, TryStreamExt};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::blob::models::{BlobOutcome, DownloadReport};
use crate::blob::TransferManager;
use crate::error::Result;
use crate::store::BlobStore;

impl TransferManager {
    /// Download the whole container into `local_dir`, collecting every
    /// blob's outcome into one report.
    pub async fn download_container(&self, local_dir: &Path) -> Result<DownloadReport> {
        let stream = self.download_container_stream(local_dir).await?;
        let outcomes = stream.collect().await;
        Ok(DownloadReport::new(outcomes))
    }

    /// Download the whole container into `local_dir`, yielding each blob's
    /// outcome as it finishes (not in submission order).
    ///
    /// At most `max_concurrent` transfers are in flight at any instant.
    /// The listing itself failing is the only fatal error; per-blob
    /// failures are reported through the yielded outcomes.
    pub async fn download_container_stream(
        &self,
        local_dir: &Path,
    ) -> Result<impl Stream<Item = BlobOutcome> + '_> {
        let names = self.store().list().await?;
        info!(
            blobs = names.len(),
            dir = %local_dir.display(),
            "downloading container contents"
        );

        let local_dir = local_dir.to_path_buf();
        let stream = futures::stream::iter(names.into_iter().map(move |name| {
            let store = Arc::clone(self.store());
            let local_dir = local_dir.clone();
            async move {
                let result = fetch_blob(store, &name, &local_dir).await;
                BlobOutcome { name, result }
            }
        }))
        .buffer_unordered(self.max_concurrent());

        Ok(stream)
    }
}

/// Download one blob to `local_dir/name`, creating missing parent
/// directories and writing the chunk stream in order.
async fn fetch_blob(store: Arc<dyn BlobStore>, name: &str, local_dir: &Path) -> Result<PathBuf> {
    let local_path = local_dir.join(name);

    if let Some(parent) = local_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::File::create(&local_path).await?;
    let mut chunks = store.download(name).await?;
    while let Some(chunk) = chunks.try_next().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(local_path)
}
