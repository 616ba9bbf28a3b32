//! Ingest command implementation
//!
//! Expands inputs (plain paths or glob patterns), runs each file through the
//! upload pipeline in order and prints the outcome. A failing file does not
//! stop the others; the command fails if any file failed.

use super::shared::{CommandStats, open_store, print_json};
use crate::app::models::{Metric, RejectedRow};
use crate::app::services::pipeline::{UploadOutcome, UploadPipeline};
use crate::app::services::report::{format_average, format_distribution};
use crate::cli::args::{GlobalArgs, IngestArgs, OutputFormat};
use crate::config::Config;
use crate::{Error, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Ingest command runner
pub async fn run_ingest(
    args: IngestArgs,
    global: &GlobalArgs,
    config: Config,
) -> Result<CommandStats> {
    let start_time = Instant::now();
    args.validate()?;
    debug!("Ingest arguments: {:?}", args);

    let files = expand_inputs(&args.inputs)?;
    info!("Ingesting {} file(s)", files.len());

    let store = open_store(&config)?;
    let pipeline = Arc::new(UploadPipeline::new(config.ingest.clone(), store));

    let progress = (files.len() > 1 && global.is_interactive())
        .then(|| create_progress_bar(files.len() as u64))
        .transpose()?;

    let mut stats = CommandStats::default();
    let mut json_results = Vec::new();

    for path in files {
        let name = path.display().to_string();
        if let Some(pb) = &progress {
            pb.set_message(name.clone());
        }

        let worker = Arc::clone(&pipeline);
        let task_path = path.clone();
        let result = tokio::task::spawn_blocking(move || worker.process_path(&task_path))
            .await
            .map_err(|e| Error::interrupted(format!("Ingest of {} did not finish: {}", name, e)))?;

        match result {
            Ok(outcome) => {
                stats.files_processed += 1;
                stats.records_ingested += outcome.summary.total_equipment;
                stats.rows_rejected += outcome.rejected.len();
                stats.warnings_raised += outcome.summary.validation_warnings.len();

                match global.output_format {
                    OutputFormat::Human if !global.quiet => {
                        with_progress_suspended(&progress, || print_outcome(&name, &outcome))
                    }
                    OutputFormat::Human => {}
                    OutputFormat::Json => json_results.push(json!({
                        "file": name,
                        "status": "stored",
                        "summary": outcome.summary.as_ref(),
                        "rejected": outcome.rejected,
                        "stats": outcome.stats,
                        "trend": outcome.trend,
                    })),
                }
            }
            Err(error) => {
                stats.files_failed += 1;
                match global.output_format {
                    OutputFormat::Human => with_progress_suspended(&progress, || {
                        eprintln!("{} {}: {}", "✘".bright_red().bold(), name, error)
                    }),
                    OutputFormat::Json => json_results.push(json!({
                        "file": name,
                        "status": "failed",
                        "error": error.to_string(),
                    })),
                }
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    stats.processing_time = start_time.elapsed();

    match global.output_format {
        OutputFormat::Json => print_json(&json_results)?,
        OutputFormat::Human if global.is_interactive() => print_totals(&stats),
        OutputFormat::Human => {}
    }

    Ok(stats)
}

/// Expand paths and glob patterns, keeping the order given
///
/// Plain paths are kept as-is so a missing file is reported as a failed
/// upload; a pattern that matches nothing is a usage error.
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs.iter().map(|i| i.trim()).filter(|i| !i.is_empty()) {
        if !is_glob_pattern(input) {
            files.push(PathBuf::from(input));
            continue;
        }

        let entries = glob::glob(input).map_err(|e| {
            Error::configuration(format!("Invalid glob pattern '{}': {}", input, e))
        })?;

        let mut matched: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        matched.sort();

        if matched.is_empty() {
            return Err(Error::configuration(format!(
                "No files match pattern '{}'",
                input
            )));
        }
        files.extend(matched);
    }

    Ok(files)
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn create_progress_bar(total: u64) -> Result<ProgressBar> {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map_err(|e| Error::configuration(format!("Invalid progress template: {}", e)))?
        .progress_chars("#>-");

    let pb = ProgressBar::new(total);
    pb.set_style(style);
    Ok(pb)
}

fn with_progress_suspended<F: FnOnce()>(progress: &Option<ProgressBar>, f: F) {
    match progress {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}

fn print_outcome(name: &str, outcome: &UploadOutcome) {
    let summary = &outcome.summary;

    println!(
        "{} {} {} {}",
        "✔".bright_green().bold(),
        name.bright_white().bold(),
        "stored as".dimmed(),
        summary.id().bright_white()
    );
    println!(
        "  {} {} ({} rejected)",
        "Equipment:".bright_cyan(),
        summary.total_equipment.to_string().bright_white().bold(),
        summary.rejected_rows
    );
    for metric in Metric::ALL {
        println!(
            "  {} {}",
            format!("Average {}:", metric).bright_cyan(),
            format_average(summary.average(metric), metric.unit())
        );
    }
    println!(
        "  {} {}",
        "Types:".bright_cyan(),
        format_distribution(&summary.equipment_type_distribution)
    );

    for warning in &summary.validation_warnings {
        println!(
            "  {} {}",
            format!("⚠ {}", warning.kind).bright_yellow().bold(),
            warning.message
        );
        for detail in &warning.details {
            println!("      {}", detail.yellow());
        }
    }

    if !outcome.rejected.is_empty() {
        println!("  {}", "Rejected rows:".bright_red());
        for row in &outcome.rejected {
            println!("    {}", describe_rejected(row));
        }
    }

    match &outcome.trend {
        Some(trend) => {
            let deltas: Vec<String> = trend
                .deltas()
                .iter()
                .map(|delta| format!("{} {}", delta.metric, delta.render()))
                .collect();
            println!(
                "  {} {}",
                "Trend vs previous:".bright_cyan(),
                deltas.join(", ")
            );
        }
        None => println!("  {}", "No previous upload to compare with".dimmed()),
    }
}

fn describe_rejected(row: &RejectedRow) -> String {
    match &row.column {
        Some(column) => format!(
            "row {} {} ({}): {}",
            row.row_index, row.reason, column, row.message
        ),
        None => format!("row {} {}: {}", row.row_index, row.reason, row.message),
    }
}

fn print_totals(stats: &CommandStats) {
    println!("\n{}", "Ingest Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time.as_millis().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "  {} {} ({} rejected rows, {} warnings)",
        "Records ingested:".bright_cyan(),
        stats.records_ingested.to_string().bright_white().bold(),
        stats.rows_rejected,
        stats.warnings_raised
    );
}
