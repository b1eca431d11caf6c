//! Integration tests for the concurrent bulk container download
//!
//! These tests use the in-memory store's transfer gauge and artificial
//! latency to observe the concurrency bound, and its poisoned blobs to
//! exercise partial failure.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use azbucket::blob::TransferManager;
use azbucket::store::MemoryBlobStore;
use futures::StreamExt;
use tempfile::TempDir;

/// Helper to build a manager with the given bulk concurrency bound
fn bulk_manager(store: Arc<MemoryBlobStore>, max_concurrent: usize) -> TransferManager {
    TransferManager::new(
        store,
        "https://unit.blob.core.windows.net/unit-container".to_string(),
        "downloads".into(),
        max_concurrent,
    )
}

#[tokio::test]
async fn test_bulk_download_mirrors_container_structure() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let store = Arc::new(MemoryBlobStore::new());
    store.insert("a.jpg", vec![0xAB; 500]).await;
    store.insert("sub/b.jpg", vec![0xCD; 10]).await;

    let manager = bulk_manager(store, 5);
    let report = manager.download_container(&out).await.unwrap();

    assert_eq!(report.len(), 2);
    assert!(report.is_complete());

    // Blob names become relative paths, parents created on demand
    assert!(out.join("sub").is_dir());
    assert_eq!(fs::read(out.join("a.jpg")).unwrap().len(), 500);
    assert_eq!(fs::read(out.join("sub/b.jpg")).unwrap().len(), 10);
}

#[tokio::test]
async fn test_bulk_download_respects_concurrency_bound() {
    let temp_dir = TempDir::new().unwrap();

    let store = Arc::new(
        MemoryBlobStore::new().with_download_delay(Duration::from_millis(25)),
    );
    for i in 0..20 {
        store.insert(format!("blob-{i:02}.bin"), vec![i as u8; 128]).await;
    }
    let gauge = store.gauge();

    let manager = bulk_manager(Arc::clone(&store), 5);
    let report = manager
        .download_container(&temp_dir.path().join("out"))
        .await
        .unwrap();

    assert_eq!(report.len(), 20);
    assert!(report.is_complete());
    assert!(
        gauge.peak() <= 5,
        "observed {} concurrent transfers, bound is 5",
        gauge.peak()
    );
    assert_eq!(gauge.current(), 0);
}

#[tokio::test]
async fn test_bulk_download_honors_smaller_bound() {
    let temp_dir = TempDir::new().unwrap();

    let store = Arc::new(
        MemoryBlobStore::new().with_download_delay(Duration::from_millis(25)),
    );
    for i in 0..10 {
        store.insert(format!("blob-{i}.bin"), vec![0u8; 64]).await;
    }
    let gauge = store.gauge();

    let manager = bulk_manager(Arc::clone(&store), 2);
    let report = manager
        .download_container(&temp_dir.path().join("out"))
        .await
        .unwrap();

    assert!(report.is_complete());
    assert!(gauge.peak() <= 2);
}

#[tokio::test]
async fn test_one_failing_blob_does_not_cancel_siblings() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let store = Arc::new(MemoryBlobStore::new());
    store.insert("ok-1.jpg", &b"one"[..]).await;
    store.insert("ok-2.jpg", &b"two"[..]).await;
    store.insert("ok-3.jpg", &b"three"[..]).await;
    store.poison("broken.jpg").await;

    let manager = bulk_manager(store, 5);
    let report = manager.download_container(&out).await.unwrap();

    assert_eq!(report.len(), 4);
    assert_eq!(report.succeeded().count(), 3);

    let failed: Vec<&str> = report.failed().map(|o| o.name.as_str()).collect();
    assert_eq!(failed, vec!["broken.jpg"]);

    // The three good blobs are all present locally
    assert_eq!(fs::read(out.join("ok-1.jpg")).unwrap(), b"one");
    assert_eq!(fs::read(out.join("ok-2.jpg")).unwrap(), b"two");
    assert_eq!(fs::read(out.join("ok-3.jpg")).unwrap(), b"three");
}

#[tokio::test]
async fn test_bulk_download_rerun_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let store = Arc::new(MemoryBlobStore::new());
    store.insert("a.txt", &b"alpha"[..]).await;
    store.insert("sub/b.txt", &b"beta"[..]).await;

    let manager = bulk_manager(store, 5);
    manager.download_container(&out).await.unwrap();

    // Tamper with one mirrored file; the rerun overwrites it in place
    fs::write(out.join("a.txt"), b"stale local edit").unwrap();

    let report = manager.download_container(&out).await.unwrap();
    assert!(report.is_complete());

    assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"alpha");
    assert_eq!(fs::read(out.join("sub/b.txt")).unwrap(), b"beta");
}

#[tokio::test]
async fn test_bulk_download_of_empty_container() {
    let temp_dir = TempDir::new().unwrap();

    let store = Arc::new(MemoryBlobStore::new());
    let manager = bulk_manager(store, 5);

    let report = manager
        .download_container(&temp_dir.path().join("out"))
        .await
        .unwrap();

    assert!(report.is_empty());
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_streaming_mode_yields_every_outcome() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out");

    let store = Arc::new(MemoryBlobStore::new());
    for i in 0..8 {
        store.insert(format!("item-{i}.bin"), vec![i as u8; 32]).await;
    }

    let manager = bulk_manager(store, 3);

    let stream = manager.download_container_stream(&out).await.unwrap();
    futures::pin_mut!(stream);

    let mut seen = Vec::new();
    while let Some(outcome) = stream.next().await {
        assert!(outcome.is_ok(), "blob {} failed", outcome.name);
        seen.push(outcome.name);
    }

    seen.sort();
    let expected: Vec<String> = (0..8).map(|i| format!("item-{i}.bin")).collect();
    assert_eq!(seen, expected);
}
