//! Instructor rater CLI
//!
//! Local execution entry point. For AWS Lambda, use `rater-lambda`.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use rater::{
    config::load_runtime_config,
    error::Result,
    models::{Config, Document, InstructorProfile, LoggingConfig},
    pipeline::{self, RateOptions},
    services::{InstructorLookup, LookupOutcome, RatingLookup},
    storage::LocalStorage,
};

/// rater - Course Schedule Instructor Rater
#[derive(Parser, Debug)]
#[command(
    name = "rater",
    version,
    about = "Enriches course schedules with instructor ratings"
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enrich the latest schedule and write it to the destination bucket
    Run {
        /// Use directories under this path as buckets instead of S3
        #[arg(long)]
        local: Option<PathBuf>,
    },

    /// List the unique instructors of a schedule file
    Instructors {
        /// Schedule JSON file
        file: PathBuf,
    },

    /// Look up a single instructor and print the resulting profile
    Lookup {
        /// Instructor name as it appears in the schedule
        name: String,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging before configuration is read.
///
/// `RUST_LOG` wins, then `--verbose`, then `LOGGING_LEVEL`.
fn init_logging(verbose: bool) {
    let directive = if verbose {
        "debug".to_string()
    } else {
        let mut logging = LoggingConfig::default();
        if let Ok(level) = std::env::var("LOGGING_LEVEL") {
            logging.level = level;
        }
        logging.filter_directive()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(directive))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_runtime_config(cli.config.as_deref())?;
    if !cli.verbose && std::env::var_os("RUST_LOG").is_none() {
        // A level from the config file can only quiet the startup filter.
        log::set_max_level(config.logging.level_filter());
    }

    match cli.command {
        Command::Run { local } => {
            let lookup = RatingLookup::from_config(&config)?;
            let options = RateOptions::from(&config);

            let outcome = match local {
                Some(root) => {
                    let source = LocalStorage::new(root.join(&config.storage.source_bucket))
                        .with_latest_by(config.storage.latest_by);
                    let destination =
                        LocalStorage::new(root.join(&config.storage.destination_bucket));
                    pipeline::run_enrichment(&source, &destination, &lookup, &options, Utc::now())
                        .await?
                }
                None => run_s3(&config, &lookup, &options).await?,
            };

            log::info!(
                "Enriched {} -> {} ({} courses, {} rated / {} unrated instructors)",
                outcome.source_key,
                outcome.location,
                outcome.courses,
                outcome.rated,
                outcome.unrated
            );
        }

        Command::Instructors { file } => {
            let bytes = std::fs::read(&file)?;
            let document = Document::from_slice(&bytes)?;
            let names: BTreeSet<String> =
                pipeline::extract_instructors(&document).into_iter().collect();

            log::info!(
                "{} unique instructors across {} courses",
                names.len(),
                document.course_count()
            );
            for name in names {
                println!("{name}");
            }
        }

        Command::Lookup { name } => {
            let lookup = RatingLookup::from_config(&config)?;
            let profile = match lookup.lookup(&name).await? {
                LookupOutcome::Found(record) => InstructorProfile::rated(name.as_str(), record),
                LookupOutcome::NotFound => {
                    log::info!("RateMyProfessors found no record of instructor '{}'", name);
                    InstructorProfile::unrated(name.as_str())
                }
            };
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            // load_runtime_config already validated; report what is in effect.
            log::info!(
                "✓ Config OK (source: {}, destination: {}, {} aliases)",
                config.storage.source_bucket,
                config.storage.destination_bucket,
                config.aliases.len()
            );
        }
    }

    Ok(())
}

#[cfg(feature = "s3")]
async fn run_s3(
    config: &Config,
    lookup: &dyn InstructorLookup,
    options: &RateOptions,
) -> Result<pipeline::EnrichOutcome> {
    use rater::storage::S3Storage;

    let client = S3Storage::client_from_env().await;
    let source = S3Storage::new(client.clone(), &config.storage.source_bucket)
        .with_latest_by(config.storage.latest_by);
    let destination = S3Storage::new(client, &config.storage.destination_bucket);
    pipeline::run_enrichment(&source, &destination, lookup, options, Utc::now()).await
}

#[cfg(not(feature = "s3"))]
async fn run_s3(
    _config: &Config,
    _lookup: &dyn InstructorLookup,
    _options: &RateOptions,
) -> Result<pipeline::EnrichOutcome> {
    Err(rater::error::AppError::config(
        "S3 support not compiled in; rebuild with --features s3 or pass --local <dir>",
    ))
}
