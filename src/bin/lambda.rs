//! AWS Lambda entry point for the instructor rater.
//!
//! Runs once per scheduled invocation.
//!
//! ## Environment Variables
//!
//! - `SOURCE_BUCKET`: staging bucket (default: `unprocessed-data`)
//! - `DESTINATION_BUCKET`: output bucket (default: `processed-data`)
//! - `LATEST_BY`: `modified` or `name`
//! - `MAX_CONCURRENT`: maximum lookups in flight
//! - `LOGGING_LEVEL`: `critical`, `error`, `warning`, `info` or `debug`
//! - `RUST_LOG`: overrides `LOGGING_LEVEL` when set

use lambda_runtime::{Error as LambdaError, service_fn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use rater::lambda;
use rater::models::LoggingConfig;

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    let logging = LoggingConfig {
        level: std::env::var("LOGGING_LEVEL").unwrap_or_else(|_| "debug".to_string()),
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Instructor rater Lambda starting...");

    lambda_runtime::run(service_fn(lambda::handler)).await
}
