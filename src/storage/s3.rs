//! AWS S3 storage implementation.
//!
//! One `S3Storage` wraps one bucket. The source bucket is only listed and
//! read; the destination bucket is created on first write if missing.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::LatestBy;
use crate::storage::{FetchedObject, ObjectInfo, ObjectStore, select_latest};

/// Region that rejects an explicit location constraint.
const DEFAULT_REGION: &str = "us-east-1";

/// Location constraint for a new bucket in `region`.
///
/// `us-east-1`, and a client without a region, must send none.
fn location_constraint(region: Option<&str>) -> Option<BucketLocationConstraint> {
    region
        .filter(|region| *region != DEFAULT_REGION)
        .map(BucketLocationConstraint::from)
}

/// S3-backed bucket.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    latest_by: LatestBy,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            latest_by: LatestBy::default(),
        }
    }

    /// Create a client from the default AWS credential chain.
    pub async fn client_from_env() -> Client {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Client::new(&config)
    }

    /// Choose how the latest object is selected.
    pub fn with_latest_by(mut self, latest_by: LatestBy) -> Self {
        self.latest_by = latest_by;
        self
    }

    /// List every object in the bucket.
    async fn list(&self) -> Result<Vec<ObjectInfo>> {
        let mut objects = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_no_such_bucket() {
                    AppError::source_unavailable(format!(
                        "bucket {} does not exist",
                        self.bucket
                    ))
                } else {
                    AppError::s3(service_err)
                }
            })?;

            for object in page.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                let modified = object
                    .last_modified()
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()));
                objects.push(ObjectInfo {
                    key: key.to_string(),
                    modified,
                });
            }
        }

        Ok(objects)
    }

    /// Read an object's full body.
    async fn read_bytes(&self, key: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::s3(e.into_service_error()))?;

        let bytes = output.body.collect().await.map_err(AppError::s3)?;
        Ok(bytes.into_bytes().to_vec())
    }

    /// Create the bucket when it does not exist yet.
    async fn ensure_bucket(&self) -> Result<()> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                log::debug!("Bucket {} already exists.", self.bucket);
                return Ok(());
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if !service_err.is_not_found() {
                    return Err(AppError::s3(service_err));
                }
            }
        }

        let mut request = self.client.create_bucket().bucket(&self.bucket);
        let region: Option<&str> = self.client.config().region().map(|r| r.as_ref());
        if let Some(constraint) = location_constraint(region) {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }
        request
            .send()
            .await
            .map_err(|e| AppError::s3(e.into_service_error()))?;

        log::info!("Bucket {} created.", self.bucket);
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    async fn fetch_latest(&self) -> Result<FetchedObject> {
        let objects = self.list().await?;
        log::debug!("Found {} objects in s3://{}", objects.len(), self.bucket);

        let latest = select_latest(&objects, self.latest_by).ok_or_else(|| {
            AppError::source_unavailable(format!("bucket {} holds no objects", self.bucket))
        })?;

        let bytes = self.read_bytes(&latest.key).await?;
        log::info!(
            "Fetched latest object s3://{}/{} ({} bytes)",
            self.bucket,
            latest.key,
            bytes.len()
        );

        Ok(FetchedObject {
            key: latest.key.clone(),
            bytes,
        })
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        self.ensure_bucket().await?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| AppError::s3(e.into_service_error()))?;

        let location = format!("s3://{}/{}", self.bucket, key);
        log::debug!("File {} uploaded to {}.", key, self.bucket);
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_region_has_no_constraint() {
        assert_eq!(location_constraint(Some("us-east-1")), None);
        assert_eq!(location_constraint(None), None);
    }

    #[test]
    fn test_other_regions_are_constrained() {
        assert_eq!(
            location_constraint(Some("eu-west-1")),
            Some(BucketLocationConstraint::EuWest1)
        );
        assert_eq!(
            location_constraint(Some("us-west-2")),
            Some(BucketLocationConstraint::UsWest2)
        );
    }
}
