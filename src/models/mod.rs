// src/models/mod.rs

//! Domain models for the enrichment job.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod document;
mod instructor;

// Re-export all public types
pub use config::{Config, LatestBy, LoggingConfig, RatingConfig, StorageConfig};
pub use document::{Course, Document, EnrichedCourse, Layout, Term, UNKNOWN_INSTRUCTOR};
pub use instructor::{
    ExternalId, InstructorProfile, RatedInstructor, RatingRecord, UnratedInstructor,
};
