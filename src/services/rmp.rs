// src/services/rmp.rs

//! RateMyProfessors search client.
//!
//! Queries the public solr search endpoint, restricted to a single school,
//! and returns the first-ranked professor document.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{ExternalId, RatingConfig, RatingRecord};
use crate::utils::http;

/// Fields searched, with first and last name boosted over the full name.
const QUERY_FIELDS: &str = "teacherfirstname_t^2000 teacherlastname_t^2000 teacherfullname_t";

/// External source of instructor ratings.
#[async_trait]
pub trait RatingSource: Send + Sync {
    /// Search for a prepared name.
    ///
    /// `Ok(None)` means the source has no match; `Err` means the query
    /// itself failed.
    async fn search(&self, query: &str) -> Result<Option<RatingRecord>>;
}

/// HTTP client for the RateMyProfessors search index.
#[derive(Clone)]
pub struct RateMyProfessors {
    client: Client,
    base_url: String,
    school_filter: String,
    school_id_filter: String,
}

impl RateMyProfessors {
    pub fn new(client: Client, config: &RatingConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            school_filter: format!("schoolname_t:\"{}\"", config.school_name),
            school_id_filter: format!("schoolid_s:{}", config.school_id),
        }
    }

    /// Build a client with its own HTTP connection pool.
    pub fn from_config(config: &RatingConfig) -> Result<Self> {
        let client = http::create_async_client(config)?;
        Ok(Self::new(client, config))
    }
}

#[async_trait]
impl RatingSource for RateMyProfessors {
    async fn search(&self, query: &str) -> Result<Option<RatingRecord>> {
        log::debug!("Searching RateMyProfessors for '{}'", query);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("solrformat", "true"),
                ("wt", "json"),
                ("q", query),
                ("qf", QUERY_FIELDS),
                ("fq", self.school_filter.as_str()),
                ("fq", self.school_id_filter.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::lookup(query, format!("search returned HTTP {status}")));
        }

        let body = response.bytes().await?;
        parse_search_response(query, &body)
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResults,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    docs: Vec<TeacherDoc>,
}

#[derive(Debug, Deserialize)]
struct TeacherDoc {
    teacherfirstname_t: String,
    teacherlastname_t: String,
    #[serde(default)]
    averageratingscore_rf: Option<f64>,
    pk_id: ExternalId,
}

/// Parse a search response body into the first-ranked record.
pub fn parse_search_response(query: &str, body: &[u8]) -> Result<Option<RatingRecord>> {
    let envelope: SearchEnvelope = serde_json::from_slice(body)
        .map_err(|e| AppError::lookup(query, format!("unexpected search response: {e}")))?;

    if envelope.response.num_found == 0 {
        return Ok(None);
    }

    let doc = envelope.response.docs.into_iter().next().ok_or_else(|| {
        AppError::lookup(
            query,
            format!(
                "search reported {} matches but returned no documents",
                envelope.response.num_found
            ),
        )
    })?;

    Ok(Some(RatingRecord {
        first_name: doc.teacherfirstname_t,
        last_name: doc.teacherlastname_t,
        rating: doc.averageratingscore_rf,
        id: doc.pk_id,
    }))
}
