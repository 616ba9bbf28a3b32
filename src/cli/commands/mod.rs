//! Command implementations for the equipment ingest CLI
//!
//! Each command lives in its own module; `shared` holds logging,
//! configuration and store setup used by all of them.

pub mod history;
pub mod ingest;
pub mod shared;

pub use shared::CommandStats;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Main command runner
///
/// Sets up logging and configuration, then dispatches to the subcommand:
/// - `ingest`: process CSV files into history
/// - `history`, `show`, `trend`, `report`: read from history
pub async fn run(args: Args) -> Result<CommandStats> {
    let command = args
        .command
        .ok_or_else(|| Error::configuration("No command given"))?;
    let global = args.global;

    shared::setup_logging(&global)?;

    let ingest_args = match &command {
        Commands::Ingest(ingest_args) => Some(ingest_args),
        _ => None,
    };
    let config = shared::load_configuration(&global, ingest_args)?;

    match command {
        Commands::Ingest(ingest_args) => ingest::run_ingest(ingest_args, &global, config).await,
        Commands::History(history_args) => {
            history::run_history(history_args, &global, config).await
        }
        Commands::Show(show_args) => history::run_show(show_args, &global, config).await,
        Commands::Trend => history::run_trend(&global, config).await,
        Commands::Report(report_args) => history::run_report(report_args, &global, config).await,
    }
}
