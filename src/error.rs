// src/error.rs

//! Unified error handling for the enrichment job.

use std::fmt;

use thiserror::Error;

/// Result type alias for enrichment operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
///
/// A rating miss is not represented here: it is an ordinary
/// [`LookupOutcome::NotFound`](crate::services::LookupOutcome) value.
#[derive(Error, Debug)]
pub enum AppError {
    /// Source bucket does not exist or holds no objects
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Fetched payload is not a usable schedule document
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Rating lookup failed for a reason other than "no match"
    #[error("Lookup failed for '{name}': {message}")]
    Lookup { name: String, message: String },

    /// AWS S3 error
    #[error("S3 error: {0}")]
    S3(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a source-unavailable error.
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable(message.into())
    }

    /// Create a malformed-input error.
    pub fn malformed(message: impl fmt::Display) -> Self {
        Self::MalformedInput(message.to_string())
    }

    /// Create a lookup transport error for the given instructor.
    pub fn lookup(name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Lookup {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Create an S3 error.
    pub fn s3(message: impl fmt::Display) -> Self {
        Self::S3(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_message() {
        let err = AppError::lookup("Jane Doe", "status 502");
        assert_eq!(err.to_string(), "Lookup failed for 'Jane Doe': status 502");
    }

    #[test]
    fn test_json_error_converts() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Json(_)));
    }
}
