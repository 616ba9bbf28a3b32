//! Command-line argument definitions for the equipment ingest tool
//!
//! This module defines the CLI interface using the clap derive API.

use crate::constants::DEFAULT_HISTORY_LIMIT;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the equipment ingest tool
///
/// Validates chemical plant equipment sensor CSV exports, summarizes them,
/// flags unsafe readings and tracks trends across uploads.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "equipment-ingest",
    version,
    about = "Validate and summarize chemical plant equipment sensor CSV uploads",
    long_about = "Parses equipment sensor CSV exports (name, type, flowrate, pressure, temperature), \
                  rejects rows that cannot be trusted, computes averages and the equipment type \
                  distribution, flags readings above safe pressure and temperature thresholds, and \
                  keeps a short history of uploads for trend comparison and reporting."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Flags shared by every subcommand
#[derive(Debug, Clone, ClapArgs)]
pub struct GlobalArgs {
    /// Path to configuration file
    ///
    /// TOML configuration file for aliases, delimiter and retention. If not
    /// specified, looks for <config_dir>/equipment-ingest/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// History snapshot file
    ///
    /// Overrides the configured history path. Defaults to
    /// <data_dir>/equipment-ingest/history.json
    #[arg(
        long = "history-file",
        value_name = "FILE",
        global = true,
        help = "History snapshot file (JSON)"
    )]
    pub history_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        global = true,
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Ingest one or more CSV files into history
    Ingest(IngestArgs),
    /// List the most recent upload summaries
    History(HistoryArgs),
    /// Show one upload summary by its timestamp
    Show(ShowArgs),
    /// Compare the two most recent uploads
    Trend,
    /// Build the report payload for the most recent upload
    Report(ReportArgs),
}

/// Arguments for the ingest command
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct IngestArgs {
    /// CSV files or glob patterns, processed in the order given
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Force a delimiter instead of sniffing it from the header line
    ///
    /// A single character, or `\t` / `tab` for tab-separated files.
    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        help = "Force a field delimiter (single character, or \\t)"
    )]
    pub delimiter: Option<String>,

    /// Abort an upload on its first malformed row
    #[arg(
        long = "strict",
        help = "Treat malformed rows as fatal instead of rejecting them"
    )]
    pub strict: bool,
}

/// Arguments for the history command
#[derive(Debug, Clone, ClapArgs)]
pub struct HistoryArgs {
    /// Number of summaries to list, newest first
    #[arg(
        short = 'n',
        long = "limit",
        value_name = "COUNT",
        default_value_t = DEFAULT_HISTORY_LIMIT,
        help = "Number of summaries to list"
    )]
    pub limit: usize,
}

/// Arguments for the show command
#[derive(Debug, Clone, ClapArgs)]
pub struct ShowArgs {
    /// Upload timestamp as printed by `ingest` or `history`
    #[arg(value_name = "UPLOADED_AT")]
    pub uploaded_at: String,
}

/// Arguments for the report command
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct ReportArgs {
    /// Write the payload to a file instead of stdout
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the report payload to a file"
    )]
    pub output: Option<PathBuf>,
}

/// Output format options for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
}

impl GlobalArgs {
    /// Get the effective log level based on verbose/quiet flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// True when human-facing extras (progress bars, banners) should be shown
    pub fn is_interactive(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            config_file: None,
            history_file: None,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }
}

impl IngestArgs {
    /// Validate ingest arguments
    pub fn validate(&self) -> Result<()> {
        if self.inputs.iter().all(|input| input.trim().is_empty()) {
            return Err(Error::configuration("No input files given"));
        }
        Ok(())
    }
}
