//! Data models for transfer operations
//!
//! Transient value types passed through the transfer calls; nothing here
//! is persisted.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Result of a single upload: the success flag and the externally-visible
/// URL of the uploaded object (`ACCOUNT_URL/CONTAINER_NAME/blob_name`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub success: bool,
    pub url: String,
}

/// Per-blob outcome record from a bulk download
#[derive(Debug)]
pub struct BlobOutcome {
    /// Blob name as listed in the container
    pub name: String,
    /// Local path written on success, or the failure reason
    pub result: Result<PathBuf>,
}

impl BlobOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate of every blob's outcome from one bulk download
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub outcomes: Vec<BlobOutcome>,
}

impl DownloadReport {
    pub fn new(outcomes: Vec<BlobOutcome>) -> Self {
        Self { outcomes }
    }

    /// Outcomes that produced a local file
    pub fn succeeded(&self) -> impl Iterator<Item = &BlobOutcome> {
        self.outcomes.iter().filter(|o| o.is_ok())
    }

    /// Outcomes that failed, with their reasons
    pub fn failed(&self) -> impl Iterator<Item = &BlobOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// True when every blob downloaded
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_ok())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AzbucketError;

    #[test]
    fn test_report_accessors() {
        let report = DownloadReport::new(vec![
            BlobOutcome {
                name: "a.jpg".to_string(),
                result: Ok(PathBuf::from("out/a.jpg")),
            },
            BlobOutcome {
                name: "b.jpg".to_string(),
                result: Err(AzbucketError::blob_not_found("b.jpg")),
            },
        ]);

        assert_eq!(report.len(), 2);
        assert_eq!(report.succeeded().count(), 1);
        assert_eq!(report.failed().count(), 1);
        assert!(!report.is_complete());

        let empty = DownloadReport::default();
        assert!(empty.is_empty());
        assert!(empty.is_complete());
    }
}
