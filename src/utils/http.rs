// src/utils/http.rs

//! HTTP client for the rating source.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::Result;
use crate::models::RatingConfig;

/// Build the client used for rating searches.
///
/// Every request asks for JSON and is bounded by the configured timeout.
pub fn create_async_client(config: &RatingConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(5)))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
