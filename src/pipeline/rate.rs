// src/pipeline/rate.rs

//! Batch rating of unique instructors.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{InstructorProfile, UNKNOWN_INSTRUCTOR};
use crate::services::{InstructorLookup, LookupOutcome};

/// Schedule name to profile, built fresh for every run.
pub type RatingMap = HashMap<String, InstructorProfile>;

/// Options for a rating pass.
#[derive(Debug, Clone)]
pub struct RateOptions {
    /// Maximum lookups in flight; 1 keeps the pass sequential
    pub max_concurrent: usize,
    /// Whether "TBD" is sent to the rating source
    pub lookup_placeholder: bool,
}

impl Default for RateOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 1,
            lookup_placeholder: true,
        }
    }
}

/// Rate every name with one lookup each.
///
/// Misses become unrated profiles. Any other lookup failure aborts the
/// whole pass.
pub async fn rate_instructors(
    lookup: &dyn InstructorLookup,
    names: &HashSet<String>,
    options: &RateOptions,
) -> Result<RatingMap> {
    // Sorted only so log lines come out in a stable order.
    let mut ordered: Vec<&String> = names.iter().collect();
    ordered.sort();

    let mut rated = RatingMap::with_capacity(names.len());
    let mut pending = Vec::with_capacity(ordered.len());
    for name in ordered {
        if !options.lookup_placeholder && name == UNKNOWN_INSTRUCTOR {
            log::debug!("Skipping lookup for placeholder instructor '{}'", name);
            rated.insert(name.clone(), InstructorProfile::unrated(name.as_str()));
        } else {
            pending.push(name);
        }
    }

    let mut results = stream::iter(pending)
        .map(|name| async move { (name, lookup.lookup(name).await) })
        .buffer_unordered(options.max_concurrent.max(1));

    while let Some((name, outcome)) = results.next().await {
        let profile = match outcome? {
            LookupOutcome::Found(record) => {
                log::debug!(
                    "Rated instructor '{}' as {} {} ({:?})",
                    name,
                    record.first_name,
                    record.last_name,
                    record.rating
                );
                InstructorProfile::rated(name.as_str(), record)
            }
            LookupOutcome::NotFound => {
                log::info!("RateMyProfessors found no record of instructor '{}'", name);
                InstructorProfile::unrated(name.as_str())
            }
        };
        rated.insert(name.clone(), profile);
    }

    Ok(rated)
}
