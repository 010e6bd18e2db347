//! Segment storage port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::storage::DiskUsage;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to stat filesystem at {path}: {message}")]
    Stat { path: String, message: String },

    #[error("Failed to list {path}: {message}")]
    List { path: String, message: String },

    #[error("Failed to move {path}: {message}")]
    Move { path: String, message: String },
}

/// Port for footage storage: disk accounting and USB offload
#[async_trait]
pub trait SegmentStore: Send + Sync {
    /// Usage of the filesystem containing `path`
    fn disk_usage(&self, path: &Path) -> Result<DiskUsage, StorageError>;

    /// Files in `dir` with the given extension (no recursion)
    fn list(&self, dir: &Path, ext: &str) -> Result<Vec<PathBuf>, StorageError>;

    /// Move all files with `ext` from `data_dir` into `<usb_dir>/data/`,
    /// removing the originals.
    ///
    /// # Returns
    /// Number of files moved
    async fn offload(&self, data_dir: &Path, usb_dir: &Path, ext: &str)
        -> Result<u64, StorageError>;
}
