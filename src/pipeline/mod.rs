//! Enrichment pipeline.
//!
//! - `extract_instructors`: unique instructor names of a schedule
//! - `rate_instructors`: one lookup per name into a `RatingMap`
//! - `inject_ratings`: swap names for profiles, keeping document shape
//! - `run_enrichment`: fetch → extract → rate → inject → write

pub mod enrich;
pub mod extract;
pub mod inject;
pub mod rate;

pub use enrich::{EnrichOutcome, Enriched, enrich_document, run_enrichment};
pub use extract::extract_instructors;
pub use inject::inject_ratings;
pub use rate::{RateOptions, RatingMap, rate_instructors};

use crate::models::Config;

impl From<&Config> for RateOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_concurrent: config.rating.max_concurrent,
            lookup_placeholder: config.rating.lookup_placeholder,
        }
    }
}
