// src/config.rs

//! Configuration loading utilities.
//!
//! Runtime configuration is layered: built-in defaults, then an optional
//! TOML file, then environment variables. The result is validated before
//! any bucket or network access happens.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load the runtime configuration.
///
/// Without a path the built-in defaults are used. An explicit path must
/// exist and parse. Environment overrides are always applied.
pub fn load_runtime_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) if !path.exists() => {
            return Err(AppError::config(format!(
                "config file {} not found",
                path.display()
            )));
        }
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            Config::load(path)?
        }
        None => Config::default(),
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("typo.toml");

        let err = load_runtime_config(Some(&path)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("typo.toml"));
    }

    #[test]
    fn test_no_file_uses_defaults() {
        let config = load_runtime_config(None).unwrap();
        assert!(!config.aliases.is_empty());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[rating]\ntimeout_secs = \"soon\"\n").unwrap();

        assert!(load_runtime_config(Some(&path)).is_err());
    }

    #[test]
    fn test_file_values_are_loaded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[rating]\nschool_id = \"1234\"\n").unwrap();

        let config = load_runtime_config(Some(&path)).unwrap();
        assert_eq!(config.rating.school_id, "1234");
    }
}
