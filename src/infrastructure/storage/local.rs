//! Local filesystem segment store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nix::sys::statvfs::statvfs;
use tokio::fs;
use tracing::info;

use crate::application::ports::{SegmentStore, StorageError};
use crate::domain::storage::DiskUsage;

/// Store working against the local filesystem and a mounted USB stick
pub struct LocalSegmentStore;

impl LocalSegmentStore {
    /// Create a new local store
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalSegmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SegmentStore for LocalSegmentStore {
    fn disk_usage(&self, path: &Path) -> Result<DiskUsage, StorageError> {
        let stat = statvfs(path).map_err(|e| StorageError::Stat {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

        let frsize = stat.fragment_size() as u64;
        let total = stat.blocks() as u64 * frsize;
        let free = stat.blocks_available() as u64 * frsize;
        let used = total - stat.blocks_free() as u64 * frsize;

        Ok(DiskUsage { total, used, free })
    }

    fn list(&self, dir: &Path, ext: &str) -> Result<Vec<PathBuf>, StorageError> {
        let entries = std::fs::read_dir(dir).map_err(|e| StorageError::List {
            path: dir.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|e| e == ext))
            .collect();
        files.sort();
        Ok(files)
    }

    async fn offload(
        &self,
        data_dir: &Path,
        usb_dir: &Path,
        ext: &str,
    ) -> Result<u64, StorageError> {
        let target_dir = usb_dir.join("data");
        fs::create_dir_all(&target_dir)
            .await
            .map_err(|e| StorageError::Move {
                path: target_dir.to_string_lossy().to_string(),
                message: e.to_string(),
            })?;

        let mut moved = 0;
        for path in self.list(data_dir, ext)? {
            let name = match path.file_name() {
                Some(name) => name.to_owned(),
                None => continue,
            };
            let target = target_dir.join(name);
            // Copy then unlink: the USB stick is a different filesystem,
            // so a rename would fail with EXDEV
            fs::copy(&path, &target)
                .await
                .map_err(|e| StorageError::Move {
                    path: path.to_string_lossy().to_string(),
                    message: e.to_string(),
                })?;
            fs::remove_file(&path)
                .await
                .map_err(|e| StorageError::Move {
                    path: path.to_string_lossy().to_string(),
                    message: e.to_string(),
                })?;
            info!("Moved {} to {}", path.display(), target.display());
            moved += 1;
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_usage_of_tempdir_is_plausible() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalSegmentStore::new();
        let usage = store.disk_usage(dir.path()).unwrap();
        assert!(usage.total > 0);
        assert!(usage.used <= usage.total);
        assert!(usage.free <= usage.total);
    }

    #[test]
    fn list_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("b.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("c.ts"), b"x").unwrap();

        let store = LocalSegmentStore::new();
        let mp4s = store.list(dir.path(), "mp4").unwrap();
        assert_eq!(mp4s.len(), 2);
        assert!(mp4s.iter().all(|p| p.extension().unwrap() == "mp4"));
    }

    #[test]
    fn list_missing_dir_is_error() {
        let store = LocalSegmentStore::new();
        assert!(store.list(Path::new("/nonexistent-beepi"), "mp4").is_err());
    }

    #[tokio::test]
    async fn offload_moves_matching_files() {
        let data = tempfile::tempdir().unwrap();
        let usb = tempfile::tempdir().unwrap();
        std::fs::write(data.path().join("a.mp4"), b"video").unwrap();
        std::fs::write(data.path().join("b.ts"), b"video").unwrap();

        let store = LocalSegmentStore::new();
        let moved = store.offload(data.path(), usb.path(), "mp4").await.unwrap();

        assert_eq!(moved, 1);
        assert!(usb.path().join("data/a.mp4").exists());
        assert!(!data.path().join("a.mp4").exists());
        // Non-matching extension stays put
        assert!(data.path().join("b.ts").exists());
    }

    #[tokio::test]
    async fn offload_empty_dir_moves_nothing() {
        let data = tempfile::tempdir().unwrap();
        let usb = tempfile::tempdir().unwrap();
        let store = LocalSegmentStore::new();
        let moved = store.offload(data.path(), usb.path(), "mp4").await.unwrap();
        assert_eq!(moved, 0);
    }
}
