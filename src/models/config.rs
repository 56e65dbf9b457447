//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source and destination buckets
    #[serde(default)]
    pub storage: StorageConfig,

    /// Rating source and lookup behavior
    #[serde(default)]
    pub rating: RatingConfig,

    /// First-name aliases applied before lookup (formal name -> indexed name)
    #[serde(default = "defaults::aliases")]
    pub aliases: BTreeMap<String, String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides using the given variable lookup.
    pub fn apply_env_with(&mut self, var: impl Fn(&str) -> Option<String>) {
        let first = |keys: &[&str]| keys.iter().find_map(|key| var(*key));

        if let Some(bucket) = first(&["SOURCE_BUCKET", "UNPROCESSED_BUCKET_NAME"]) {
            self.storage.source_bucket = bucket;
        }
        if let Some(bucket) = first(&["DESTINATION_BUCKET", "PROCESSED_BUCKET_NAME"]) {
            self.storage.destination_bucket = bucket;
        }
        if let Some(value) = var("LATEST_BY") {
            match value.to_lowercase().as_str() {
                "modified" => self.storage.latest_by = LatestBy::Modified,
                "name" => self.storage.latest_by = LatestBy::Name,
                other => log::warn!("Ignoring LATEST_BY={other}: expected 'modified' or 'name'"),
            }
        }
        if let Some(url) = var("RMP_BASE_URL") {
            self.rating.base_url = url;
        }
        if let Some(name) = var("RMP_SCHOOL_NAME") {
            self.rating.school_name = name;
        }
        if let Some(id) = var("RMP_SCHOOL_ID") {
            self.rating.school_id = id;
        }
        if let Some(secs) = parse_var(&var, "RMP_TIMEOUT_SECS") {
            self.rating.timeout_secs = secs;
        }
        if let Some(n) = parse_var(&var, "MAX_CONCURRENT") {
            self.rating.max_concurrent = n;
        }
        if let Some(flag) = parse_var(&var, "LOOKUP_PLACEHOLDER") {
            self.rating.lookup_placeholder = flag;
        }
        if let Some(level) = var("LOGGING_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.storage.source_bucket.trim().is_empty() {
            return Err(AppError::validation("storage.source_bucket is empty"));
        }
        if self.storage.destination_bucket.trim().is_empty() {
            return Err(AppError::validation("storage.destination_bucket is empty"));
        }
        Url::parse(&self.rating.base_url).map_err(|e| {
            AppError::validation(format!(
                "rating.base_url '{}' is not a valid URL: {e}",
                self.rating.base_url
            ))
        })?;
        if self.rating.user_agent.trim().is_empty() {
            return Err(AppError::validation("rating.user_agent is empty"));
        }
        if self.rating.timeout_secs == 0 {
            return Err(AppError::validation("rating.timeout_secs must be > 0"));
        }
        if self.rating.max_concurrent == 0 {
            return Err(AppError::validation("rating.max_concurrent must be > 0"));
        }
        if self.aliases.keys().any(|alias| alias.split_whitespace().count() != 1) {
            return Err(AppError::validation("aliases must map single first names"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            rating: RatingConfig::default(),
            aliases: defaults::aliases(),
            logging: LoggingConfig::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {key}={raw}: not a valid value");
            None
        }
    }
}

/// How the "latest" object in the source bucket is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatestBy {
    /// Most recent modification time
    #[default]
    Modified,
    /// Lexically greatest object key
    Name,
}

/// Bucket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Staging bucket holding raw schedule documents
    #[serde(default = "defaults::source_bucket")]
    pub source_bucket: String,

    /// Bucket receiving enriched documents
    #[serde(default = "defaults::destination_bucket")]
    pub destination_bucket: String,

    #[serde(default)]
    pub latest_by: LatestBy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            source_bucket: defaults::source_bucket(),
            destination_bucket: defaults::destination_bucket(),
            latest_by: LatestBy::default(),
        }
    }
}

/// Rating source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Search endpoint of the rating index
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// School the search is restricted to
    #[serde(default = "defaults::school_name")]
    pub school_name: String,

    #[serde(default = "defaults::school_id")]
    pub school_id: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum lookups in flight
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Send the "TBD" placeholder to the rating source like any other name
    #[serde(default = "defaults::lookup_placeholder")]
    pub lookup_placeholder: bool,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            school_name: defaults::school_name(),
            school_id: defaults::school_id(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
            lookup_placeholder: defaults::lookup_placeholder(),
        }
    }
}

const NOISY_TARGETS: [&str; 8] = [
    "hyper",
    "hyper_util",
    "reqwest",
    "rustls",
    "h2",
    "aws_config",
    "aws_smithy_runtime",
    "aws_sdk_s3",
];

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of critical, error, warning, info, debug
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Level name understood by `env_logger` and `EnvFilter`.
    ///
    /// Unknown names fall back to debug.
    pub fn filter_level(&self) -> &'static str {
        match self.level.trim().to_lowercase().as_str() {
            "critical" | "error" => "error",
            "warning" | "warn" => "warn",
            "info" => "info",
            "trace" => "trace",
            _ => "debug",
        }
    }

    /// Maximum level for the `log` facade.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.filter_level()
            .parse()
            .unwrap_or(log::LevelFilter::Debug)
    }

    /// Full filter directive with noisy HTTP and AWS internals capped at warn.
    pub fn filter_directive(&self) -> String {
        let level = self.filter_level();
        let mut directive = level.to_string();
        if matches!(level, "info" | "debug" | "trace") {
            for target in NOISY_TARGETS {
                directive.push_str(&format!(",{target}=warn"));
            }
        }
        directive
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::collections::BTreeMap;

    // Storage defaults
    pub fn source_bucket() -> String {
        "unprocessed-data".into()
    }
    pub fn destination_bucket() -> String {
        "processed-data".into()
    }

    // Rating defaults
    pub fn base_url() -> String {
        "https://search-production.ratemyprofessors.com/solr/rmp/select/".into()
    }
    pub fn school_name() -> String {
        "Portland State University".into()
    }
    pub fn school_id() -> String {
        "775".into()
    }
    pub fn user_agent() -> String {
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn max_concurrent() -> usize {
        1
    }
    pub fn lookup_placeholder() -> bool {
        true
    }

    pub fn aliases() -> BTreeMap<String, String> {
        BTreeMap::from([("Barton".to_string(), "Bart".to_string())])
    }

    pub fn log_level() -> String {
        "debug".into()
    }
}
