// src/pipeline/enrich.rs

//! End-to-end enrichment run: fetch, extract, rate, reinject, write.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::{Course, Document, EnrichedCourse};
use crate::services::InstructorLookup;
use crate::storage::ObjectStore;
use crate::utils::{generate_filename, object_key};

use super::extract::extract_instructors;
use super::inject::inject_ratings;
use super::rate::{RateOptions, rate_instructors};

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichOutcome {
    /// Object that was enriched
    pub source_key: String,
    /// Key the enriched document was written under
    pub key: String,
    /// Printable destination location
    pub location: String,
    pub courses: usize,
    pub instructors: usize,
    pub rated: usize,
    pub unrated: usize,
}

/// Enriched document plus the counts reported for it.
#[derive(Debug)]
pub struct Enriched {
    pub document: Document<EnrichedCourse>,
    pub instructors: usize,
    pub rated: usize,
}

/// Enrich a decoded document in memory.
pub async fn enrich_document(
    document: Document<Course>,
    lookup: &dyn InstructorLookup,
    options: &RateOptions,
) -> Result<Enriched> {
    let instructors = extract_instructors(&document);
    log::info!("Found {} unique instructors", instructors.len());

    let ratings = rate_instructors(lookup, &instructors, options).await?;
    let rated = ratings.values().filter(|p| p.is_rated()).count();
    log::info!("Rated {} of {} instructors", rated, ratings.len());

    Ok(Enriched {
        document: inject_ratings(document, &ratings),
        instructors: instructors.len(),
        rated,
    })
}

/// Run the whole job once.
///
/// Nothing is written unless every step before the write succeeds.
pub async fn run_enrichment(
    source: &dyn ObjectStore,
    destination: &dyn ObjectStore,
    lookup: &dyn InstructorLookup,
    options: &RateOptions,
    now: DateTime<Utc>,
) -> Result<EnrichOutcome> {
    let latest = source.fetch_latest().await?;
    let document = Document::from_slice(&latest.bytes)?;
    let courses = document.course_count();
    log::info!(
        "Loaded {} with {} terms and {} courses",
        latest.key,
        document.terms.len(),
        courses
    );

    let enriched = enrich_document(document, lookup, options).await?;

    let key = object_key(enriched.document.partition(), &generate_filename(&now));
    let bytes = enriched.document.to_vec()?;
    let location = destination.put(&key, &bytes).await?;
    log::info!("Wrote enriched schedule to {}", location);

    Ok(EnrichOutcome {
        source_key: latest.key,
        key,
        location,
        courses,
        instructors: enriched.instructors,
        rated: enriched.rated,
        unrated: enriched.instructors - enriched.rated,
    })
}
