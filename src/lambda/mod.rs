// src/lambda/mod.rs

//! AWS Lambda handler for the enrichment job.
//!
//! This module provides the Lambda function entry point that:
//! 1. Reads the latest schedule from the source bucket
//! 2. Rates every unique instructor once
//! 3. Writes the enriched schedule to the destination bucket
//!
//! A failed run fails the invocation.

use std::time::{Duration, Instant};

use chrono::Utc;
use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::load_runtime_config;
use crate::error::Result;
use crate::pipeline::{EnrichOutcome, RateOptions, run_enrichment};
use crate::services::RatingLookup;
use crate::storage::S3Storage;

/// Lambda invocation payload.
///
/// Scheduled invocations send an empty object; both buckets can be
/// overridden for manual runs.
#[derive(Debug, Default, Deserialize)]
pub struct EnrichRequest {
    #[serde(default)]
    pub source_bucket: Option<String>,

    #[serde(default)]
    pub destination_bucket: Option<String>,
}

/// Lambda response payload for a successful run.
#[derive(Debug, Serialize)]
pub struct EnrichResponse {
    /// Destination key of the enriched document
    pub key: String,

    pub courses: usize,
    pub instructors: usize,
    pub rated: usize,
    pub unrated: usize,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

impl From<EnrichOutcome> for EnrichResponse {
    fn from(outcome: EnrichOutcome) -> Self {
        Self {
            key: outcome.key,
            courses: outcome.courses,
            instructors: outcome.instructors,
            rated: outcome.rated,
            unrated: outcome.unrated,
            execution_time_ms: 0,
        }
    }
}

/// Main Lambda handler function.
#[instrument(skip(event))]
pub async fn handler(
    event: LambdaEvent<EnrichRequest>,
) -> std::result::Result<EnrichResponse, LambdaError> {
    let start = Instant::now();
    let (request, _context) = event.into_parts();

    info!(
        "Starting enrichment: source={:?}, destination={:?}",
        request.source_bucket, request.destination_bucket
    );

    respond(run(&request).await, start.elapsed())
}

/// Turn a run result into the invocation result.
///
/// A failed run fails the invocation, so it shows up in the function's
/// error metrics and failure destinations.
fn respond(
    outcome: Result<EnrichOutcome>,
    elapsed: Duration,
) -> std::result::Result<EnrichResponse, LambdaError> {
    match outcome {
        Ok(outcome) => {
            let mut response = EnrichResponse::from(outcome);
            response.execution_time_ms = elapsed.as_millis() as u64;
            info!(
                "Enrichment completed: {} courses, {} instructors ({} rated) in {}ms",
                response.courses,
                response.instructors,
                response.rated,
                response.execution_time_ms
            );
            Ok(response)
        }
        Err(e) => {
            error!("Enrichment failed after {}ms: {}", elapsed.as_millis(), e);
            Err(e.into())
        }
    }
}

/// Internal enrichment logic.
async fn run(request: &EnrichRequest) -> Result<EnrichOutcome> {
    let mut config = load_runtime_config(None)?;
    if let Some(bucket) = &request.source_bucket {
        config.storage.source_bucket = bucket.clone();
    }
    if let Some(bucket) = &request.destination_bucket {
        config.storage.destination_bucket = bucket.clone();
    }
    config.validate()?;

    let client = S3Storage::client_from_env().await;
    let source = S3Storage::new(client.clone(), &config.storage.source_bucket)
        .with_latest_by(config.storage.latest_by);
    let destination = S3Storage::new(client, &config.storage.destination_bucket);
    let lookup = RatingLookup::from_config(&config)?;

    run_enrichment(
        &source,
        &destination,
        &lookup,
        &RateOptions::from(&config),
        Utc::now(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_enrich_request_defaults() {
        let req: EnrichRequest = serde_json::from_str("{}").unwrap();
        assert!(req.source_bucket.is_none());
        assert!(req.destination_bucket.is_none());
    }

    #[test]
    fn test_enrich_request_with_buckets() {
        let json = r#"{"source_bucket": "raw", "destination_bucket": "rated"}"#;
        let req: EnrichRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.source_bucket.as_deref(), Some("raw"));
        assert_eq!(req.destination_bucket.as_deref(), Some("rated"));
    }

    fn outcome() -> EnrichOutcome {
        EnrichOutcome {
            source_key: "20200101000000.json".to_string(),
            key: "202001/20200115083000.json".to_string(),
            location: "s3://processed-data/202001/20200115083000.json".to_string(),
            courses: 4,
            instructors: 3,
            rated: 2,
            unrated: 1,
        }
    }

    #[test]
    fn test_successful_run_is_reported() {
        let response = respond(Ok(outcome()), Duration::from_millis(42)).unwrap();
        assert_eq!(response.key, "202001/20200115083000.json");
        assert_eq!(response.rated, 2);
        assert_eq!(response.execution_time_ms, 42);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["courses"], 4);
    }

    #[test]
    fn test_failed_run_fails_invocation() {
        let err = respond(
            Err(AppError::source_unavailable("bucket raw holds no objects")),
            Duration::from_millis(5),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Source unavailable: bucket raw holds no objects"
        );
    }
}
