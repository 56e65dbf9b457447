//! Service layer for the enrichment job.
//!
//! This module contains:
//! - Name preparation (`AliasTable`, `reduce_name`)
//! - The RateMyProfessors search client (`RateMyProfessors`)
//! - The lookup adapter turning searches into outcomes (`RatingLookup`)

mod lookup;
mod names;
mod rmp;

pub use lookup::{InstructorLookup, LookupOutcome, RatingLookup};
pub use names::{AliasTable, reduce_name};
pub use rmp::{RateMyProfessors, RatingSource, parse_search_response};
