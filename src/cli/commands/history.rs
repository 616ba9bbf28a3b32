//! History command implementations: history, show, trend, report

use super::shared::{CommandStats, open_store, print_json, to_pretty_json};
use crate::app::models::{Metric, UploadSummary};
use crate::app::services::history_store::HistoryStore;
use crate::app::services::report::{ReportPayload, format_average, format_distribution};
use crate::app::services::trend_comparator::{self, TrendComparison};
use crate::cli::args::{GlobalArgs, HistoryArgs, OutputFormat, ReportArgs, ShowArgs};
use crate::config::Config;
use crate::{Error, Result};
use chrono::Utc;
use colored::Colorize;
use tracing::info;

/// List the most recent summaries, newest first
pub async fn run_history(
    args: HistoryArgs,
    global: &GlobalArgs,
    config: Config,
) -> Result<CommandStats> {
    let store = open_store(&config)?;
    let summaries = store.list(args.limit);

    match global.output_format {
        OutputFormat::Json => {
            let plain: Vec<&UploadSummary> = summaries.iter().map(|s| s.as_ref()).collect();
            print_json(&plain)?;
        }
        OutputFormat::Human => {
            if summaries.is_empty() {
                println!("{}", "No uploads in history".dimmed());
            }
            for summary in &summaries {
                print_history_line(summary);
            }
        }
    }

    Ok(CommandStats {
        summaries_shown: summaries.len(),
        ..Default::default()
    })
}

/// Show one summary in full
pub async fn run_show(args: ShowArgs, global: &GlobalArgs, config: Config) -> Result<CommandStats> {
    let store = open_store(&config)?;
    let summary = store.get_by_id(&args.uploaded_at)?;

    match global.output_format {
        OutputFormat::Json => print_json(summary.as_ref())?,
        OutputFormat::Human => print_summary(&summary),
    }

    Ok(CommandStats {
        summaries_shown: 1,
        ..Default::default()
    })
}

/// Compare the two most recent summaries
pub async fn run_trend(global: &GlobalArgs, config: Config) -> Result<CommandStats> {
    let store = open_store(&config)?;
    let trend = trend_comparator::compare_latest(store.as_ref());

    match global.output_format {
        OutputFormat::Json => print_json(&trend)?,
        OutputFormat::Human => match &trend {
            Some(trend) => print_trend(trend),
            None => println!(
                "{}",
                "Not enough history for a trend (two uploads needed)".dimmed()
            ),
        },
    }

    Ok(CommandStats {
        summaries_shown: if trend.is_some() { 2 } else { 0 },
        ..Default::default()
    })
}

/// Build the report payload for the latest summary
pub async fn run_report(
    args: ReportArgs,
    global: &GlobalArgs,
    config: Config,
) -> Result<CommandStats> {
    let store = open_store(&config)?;
    let payload = ReportPayload::from_store(store.as_ref(), Utc::now())?;

    match &args.output {
        Some(path) => {
            let json = to_pretty_json(&payload)?;
            std::fs::write(path, json).map_err(|e| {
                Error::io(format!("Failed to write report {}", path.display()), e)
            })?;
            info!("Report payload written to {}", path.display());
            if global.is_interactive() {
                println!("Report written to {}", path.display());
            }
        }
        None => match global.output_format {
            OutputFormat::Json => print_json(&payload)?,
            OutputFormat::Human => print!("{}", payload.to_text()),
        },
    }

    Ok(CommandStats {
        summaries_shown: 1,
        ..Default::default()
    })
}

fn print_history_line(summary: &UploadSummary) {
    let warnings = if summary.has_warnings() {
        format!("{} warning(s)", summary.validation_warnings.len())
            .bright_yellow()
            .to_string()
    } else {
        "ok".bright_green().to_string()
    };

    println!(
        "{}  {:<24} {:>4} equipment  {:>3} rejected  {}",
        summary.id().bright_white(),
        summary.filename.as_deref().unwrap_or("-"),
        summary.total_equipment,
        summary.rejected_rows,
        warnings
    );
}

fn print_summary(summary: &UploadSummary) {
    println!("{}", summary.id().bright_white().bold());
    if let Some(filename) = &summary.filename {
        println!("  {} {}", "File:".bright_cyan(), filename);
    }
    println!(
        "  {} {} ({} rejected)",
        "Equipment:".bright_cyan(),
        summary.total_equipment,
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

    if let Some(equipment) = &summary.equipment {
        println!("  {}", "Equipment list:".bright_cyan());
        for record in equipment {
            println!(
                "    {:<16} {:<12} {:>10.2} {:>8.2} {:>8.2}",
                record.name,
                record.equipment_type,
                record.flowrate,
                record.pressure,
                record.temperature
            );
        }
    }
}

fn print_trend(trend: &TrendComparison) {
    println!(
        "{} {} {} {}",
        "Trend".bright_green().bold(),
        trend.previous_uploaded_at.to_rfc3339().dimmed(),
        "→".dimmed(),
        trend.latest_uploaded_at.to_rfc3339().bright_white()
    );
    for delta in trend.deltas() {
        println!(
            "  {:<12} {:>14} → {:<14} {}",
            delta.metric.to_string(),
            format_average(delta.previous, delta.metric.unit()),
            format_average(delta.latest, delta.metric.unit()),
            delta.render()
        );
    }
}
