//! Storage abstractions for schedule documents.
//!
//! A bucket is read by picking its latest object and written by putting a
//! single new object. Two backends implement [`ObjectStore`]:
//!
//! - [`LocalStorage`]: a directory per bucket, for development and tests
//! - `S3Storage`: AWS S3 (feature `s3`)

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::LatestBy;

// Re-export for convenience
pub use local::LocalStorage;
#[cfg(feature = "s3")]
pub use s3::S3Storage;

/// Listing entry used to choose the latest object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub modified: Option<DateTime<Utc>>,
}

/// Contents of the object chosen as latest.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub key: String,
    pub bytes: Vec<u8>,
}

/// Trait for bucket-like storage backends.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the most recent object.
    ///
    /// Fails with [`SourceUnavailable`](crate::error::AppError::SourceUnavailable)
    /// when the bucket is missing or empty.
    async fn fetch_latest(&self) -> Result<FetchedObject>;

    /// Write an object, creating the bucket if needed.
    ///
    /// Returns a printable location for logs.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String>;
}

/// Pick the latest object from a listing.
///
/// Objects without a modification time sort before those with one; ties
/// are broken by key so the choice is stable across listings.
pub fn select_latest(objects: &[ObjectInfo], latest_by: LatestBy) -> Option<&ObjectInfo> {
    match latest_by {
        LatestBy::Modified => objects
            .iter()
            .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.key.cmp(&b.key))),
        LatestBy::Name => objects.iter().max_by(|a, b| a.key.cmp(&b.key)),
    }
}
