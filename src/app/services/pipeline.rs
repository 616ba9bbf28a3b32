//! Upload pipeline: parse, validate, aggregate, warn, store, compare
//!
//! Each upload runs as one sequential pass. The history store is injected,
//! and nothing is appended to it unless every earlier stage succeeded.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::models::{EquipmentRecord, PendingSummary, RejectedRow, UploadSummary, Warning};
use crate::app::services::aggregator::{self, Aggregate};
use crate::app::services::csv_parser::CsvParser;
use crate::app::services::history_store::{Appended, HistoryStore};
use crate::app::services::record_validator::{IngestStats, RecordValidator};
use crate::app::services::trend_comparator::{self, TrendComparison};
use crate::app::services::warning_engine;
use crate::config::IngestConfig;
use crate::constants::UNNAMED_UPLOAD;
use crate::{Error, Result};

/// Everything one successful upload produced
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// The stored summary
    pub summary: Arc<UploadSummary>,

    /// Rows that did not validate, in input order
    pub rejected: Vec<RejectedRow>,

    pub stats: IngestStats,

    /// This summary against the one stored directly before it, absent for
    /// the first upload
    pub trend: Option<TrendComparison>,
}

impl UploadOutcome {
    /// True when the summary carries threshold warnings
    pub fn has_warnings(&self) -> bool {
        self.summary.has_warnings()
    }
}

/// Runs uploads against a shared history store
pub struct UploadPipeline {
    parser: CsvParser,
    validator: RecordValidator,
    store: Arc<dyn HistoryStore>,
}

impl UploadPipeline {
    /// Create a pipeline with ingest configuration and an injected store
    pub fn new(config: IngestConfig, store: Arc<dyn HistoryStore>) -> Self {
        Self {
            validator: RecordValidator::from_config(&config),
            parser: CsvParser::new(config),
            store,
        }
    }

    /// The history store this pipeline appends to
    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    /// Process one upload from raw bytes
    pub fn process(&self, bytes: &[u8], filename: Option<&str>) -> Result<UploadOutcome> {
        let file = filename.unwrap_or(UNNAMED_UPLOAD);

        let rows = self.parser.parse(bytes, file)?;
        let validated = self.validator.validate_rows(rows, file)?;

        let aggregate = aggregator::aggregate(&validated.records);
        let warnings = warning_engine::evaluate(&validated.records);
        for warning in &warnings {
            warn!(
                "{}: {} ({} record(s))",
                file,
                warning.message,
                warning.details.len()
            );
        }

        let pending = build_summary(
            filename,
            aggregate,
            warnings,
            validated.rejected.len(),
            validated.records,
        );
        let Appended { summary, previous } = self.store.append_entry(pending)?;
        info!(
            "Stored upload {} from {}: {} equipment, {} rejected row(s)",
            summary.id(),
            file,
            summary.total_equipment,
            summary.rejected_rows
        );

        let trend = previous.map(|previous| trend_comparator::compare(&summary, &previous));

        Ok(UploadOutcome {
            summary,
            rejected: validated.rejected,
            stats: validated.stats,
            trend,
        })
    }

    /// Read a file from disk and process it under its file name
    pub fn process_path(&self, path: &Path) -> Result<UploadOutcome> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
        let filename = path.file_name().map(|name| name.to_string_lossy());

        self.process(&bytes, filename.as_deref())
    }
}

fn build_summary(
    filename: Option<&str>,
    aggregate: Aggregate,
    warnings: Vec<Warning>,
    rejected_rows: usize,
    records: Vec<EquipmentRecord>,
) -> PendingSummary {
    PendingSummary {
        filename: filename.map(str::to_string),
        total_equipment: aggregate.total_equipment,
        average_flowrate: aggregate.average_flowrate,
        average_pressure: aggregate.average_pressure,
        average_temperature: aggregate.average_temperature,
        equipment_type_distribution: aggregate.equipment_type_distribution,
        validation_warnings: warnings,
        rejected_rows,
        equipment: Some(records),
    }
}
