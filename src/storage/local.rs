//! Local filesystem storage implementation.
//!
//! Treats a directory as a bucket: every regular file below it is an
//! object whose key is its relative path. Production deployments should use
//! `S3Storage`.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── 20200110093000.json       # Flat or nested documents
//! └── 202001/                   # Keyed documents, partitioned by first term
//!     └── 20200112093000.json
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::LatestBy;
use crate::storage::{FetchedObject, ObjectInfo, ObjectStore, select_latest};

/// Extension of in-progress writes, never listed as objects.
const TMP_EXTENSION: &str = "tmp";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    latest_by: LatestBy,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            latest_by: LatestBy::default(),
        }
    }

    /// Choose how the latest object is selected.
    pub fn with_latest_by(mut self, latest_by: LatestBy) -> Self {
        self.latest_by = latest_by;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension(TMP_EXTENSION);
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// List every object below the root.
    async fn list(&self) -> Result<Vec<ObjectInfo>> {
        let mut objects = Vec::new();
        let mut pending = vec![self.root_dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let metadata = entry.metadata().await?;

                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                if !metadata.is_file()
                    || path.extension().is_some_and(|ext| ext == TMP_EXTENSION)
                {
                    continue;
                }

                let Some(key) = self.key_for(&path) else {
                    continue;
                };
                objects.push(ObjectInfo {
                    key,
                    modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                });
            }
        }

        Ok(objects)
    }

    /// Relative key for a path below the root, always `/`-separated.
    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root_dir).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

#[async_trait]
impl ObjectStore for LocalStorage {
    async fn fetch_latest(&self) -> Result<FetchedObject> {
        if !tokio::fs::try_exists(&self.root_dir).await? {
            return Err(AppError::source_unavailable(format!(
                "bucket directory {} does not exist",
                self.root_dir.display()
            )));
        }

        let objects = self.list().await?;
        log::debug!(
            "Found {} objects in {}",
            objects.len(),
            self.root_dir.display()
        );

        let latest = select_latest(&objects, self.latest_by).ok_or_else(|| {
            AppError::source_unavailable(format!(
                "bucket directory {} holds no objects",
                self.root_dir.display()
            ))
        })?;

        let bytes = tokio::fs::read(self.path(&latest.key)).await?;
        log::info!("Fetched latest object {} ({} bytes)", latest.key, bytes.len());

        Ok(FetchedObject {
            key: latest.key.clone(),
            bytes,
        })
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        if !tokio::fs::try_exists(&self.root_dir).await? {
            tokio::fs::create_dir_all(&self.root_dir).await?;
            log::debug!("Bucket directory {} created", self.root_dir.display());
        }

        self.write_bytes(key, bytes).await?;
        let location = self.path(key).display().to_string();
        log::debug!("File {} uploaded to {}", key, self.root_dir.display());
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn set_modified(path: &Path, secs_ago: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
            .unwrap();
    }

    #[tokio::test]
    async fn test_put_and_fetch() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("bucket"));

        storage.put("202001/a.json", b"[]").await.unwrap();
        let latest = storage.fetch_latest().await.unwrap();

        assert_eq!(latest.key, "202001/a.json");
        assert_eq!(latest.bytes, b"[]".to_vec());
    }

    #[tokio::test]
    async fn test_fetch_missing_bucket() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nope"));

        let err = storage.fetch_latest().await.unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_empty_bucket() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let err = storage.fetch_latest().await.unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_latest_by_modified_time() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("9999.json"), b"old").unwrap();
        std::fs::write(tmp.path().join("0001.json"), b"new").unwrap();
        set_modified(&tmp.path().join("9999.json"), 3600);
        set_modified(&tmp.path().join("0001.json"), 60);

        let latest = LocalStorage::new(tmp.path()).fetch_latest().await.unwrap();
        assert_eq!(latest.bytes, b"new".to_vec());

        let by_name = LocalStorage::new(tmp.path())
            .with_latest_by(LatestBy::Name)
            .fetch_latest()
            .await
            .unwrap();
        assert_eq!(by_name.key, "9999.json");
    }

    #[tokio::test]
    async fn test_tmp_files_are_not_objects() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("partial.tmp"), b"x").unwrap();

        let err = LocalStorage::new(tmp.path()).fetch_latest().await.unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }
}
