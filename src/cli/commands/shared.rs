//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::app::services::history_store::InMemoryHistoryStore;
use crate::cli::args::{GlobalArgs, IngestArgs};
use crate::config::{Config, parse_delimiter};
use crate::constants::{CONFIG_DIR_NAME, HISTORY_FILE_NAME};
use crate::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct CommandStats {
    /// Number of files ingested successfully
    pub files_processed: usize,
    /// Number of files that failed
    pub files_failed: usize,
    /// Valid equipment records across successful files
    pub records_ingested: usize,
    /// Rejected rows across successful files
    pub rows_rejected: usize,
    /// Threshold warnings raised across successful files
    pub warnings_raised: usize,
    /// Summaries printed by read commands
    pub summaries_shown: usize,
    /// Total processing time
    pub processing_time: Duration,
}

impl CommandStats {
    /// True when no file failed
    pub fn is_successful(&self) -> bool {
        self.files_failed == 0
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &GlobalArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("equipment_ingest={}", log_level)));

    let installed = if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    installed.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(args: &GlobalArgs, ingest: Option<&IngestArgs>) -> Result<Config> {
    // Determine config file path
    let default_config_path = if args.config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_ref()
            .filter(|path| path.exists())
            .map(|path| path.as_path()),
    };

    if let Some(config_path) = config_file {
        info!("Using config file: {}", config_path.display());
    } else {
        debug!("No config file found, using defaults and environment variables");
    }

    let mut config = Config::load_layered(config_file)?;

    // Apply CLI argument overrides
    apply_cli_overrides(&mut config, args, ingest)?;

    if config.history.path.is_none() {
        config.history.path = default_history_path();
    }

    // Final validation
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(
    config: &mut Config,
    args: &GlobalArgs,
    ingest: Option<&IngestArgs>,
) -> Result<()> {
    if let Some(history_file) = &args.history_file {
        config.history.path = Some(history_file.clone());
    }

    if let Some(ingest) = ingest {
        if let Some(delimiter) = &ingest.delimiter {
            config.ingest.delimiter = Some(parse_delimiter(delimiter)?);
        }
        if ingest.strict {
            config.ingest.strict_structure = true;
        }
    }

    Ok(())
}

/// `<data_dir>/equipment-ingest/history.json`
pub fn default_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(HISTORY_FILE_NAME))
}

/// Open the history store described by the configuration
pub fn open_store(config: &Config) -> Result<Arc<InMemoryHistoryStore>> {
    if let Some(path) = &config.history.path {
        debug!("History snapshot: {}", path.display());
    }
    InMemoryHistoryStore::open(config.history.clone()).map(Arc::new)
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = to_pretty_json(value)?;
    println!("{}", json);
    Ok(())
}

/// Serialize a value as pretty JSON
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::serialization("Failed to serialize output", e))
}
