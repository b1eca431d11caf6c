//! Blob transfer operations
//!
//! This module provides the transfer primitives over a [`crate::store::BlobStore`]:
//! single-object upload and download, container listing, and the concurrent
//! bulk container download.

pub mod bulk;
pub mod manager;
pub mod models;

// Re-export commonly used types
pub use manager::{create_transfer_manager, TransferManager};
pub use models::*;
