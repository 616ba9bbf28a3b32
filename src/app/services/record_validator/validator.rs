//! Row-to-record validation

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::field_parsers::{FieldIssue, equipment_name, required_reading, required_text};
use super::stats::IngestStats;
use crate::app::models::{EquipmentRecord, RejectReason, RejectedRow};
use crate::app::services::csv_parser::{MalformedRow, RawRow};
use crate::config::IngestConfig;
use crate::constants::columns;
use crate::{Error, Result};

/// Outcome of validating every row of one upload
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Valid records in input order
    pub records: Vec<EquipmentRecord>,
    /// Rejected rows in input order
    pub rejected: Vec<RejectedRow>,
    pub stats: IngestStats,
}

/// Validates parsed rows into equipment records
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    strict_structure: bool,
}

impl RecordValidator {
    /// Create a validator; `strict_structure` makes malformed rows fatal
    pub fn new(strict_structure: bool) -> Self {
        Self { strict_structure }
    }

    /// Create a validator from ingest configuration
    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(config.strict_structure)
    }

    /// Validate every row, keeping rejected rows alongside the records
    pub fn validate_rows<I>(&self, rows: I, file: &str) -> Result<ValidationResult>
    where
        I: IntoIterator<Item = std::result::Result<RawRow, MalformedRow>>,
    {
        let mut records = Vec::new();
        let mut rejected = Vec::new();
        let mut stats = IngestStats::new();

        for row in rows {
            let outcome = match row {
                Ok(raw) => self.validate_row(&raw),
                Err(malformed) => {
                    if self.strict_structure {
                        return Err(Error::malformed_row(
                            file,
                            malformed.row_index,
                            malformed.message,
                        ));
                    }
                    warn!(
                        "Malformed row {} in {}: {}",
                        malformed.row_index, file, malformed.message
                    );
                    Err(rejected_malformed(malformed))
                }
            };

            match outcome {
                Ok(record) => {
                    stats.record_valid();
                    records.push(record);
                }
                Err(row) => {
                    debug!(
                        "Rejected row {} in {}: {} ({}) [{}]",
                        row.row_index,
                        file,
                        row.reason,
                        row.message,
                        describe_fields(&row.raw_fields)
                    );
                    stats.record_rejected(row.reason);
                    rejected.push(row);
                }
            }
        }

        if records.is_empty() {
            return Err(Error::no_valid_records(file, rejected.len()));
        }

        info!("{}: {}", file, stats.summary());

        Ok(ValidationResult {
            records,
            rejected,
            stats,
        })
    }

    /// Validate a single well-formed row.
    ///
    /// Fields are checked in column order and the first problem wins.
    pub fn validate_row(&self, row: &RawRow) -> std::result::Result<EquipmentRecord, RejectedRow> {
        self.build_record(row).map_err(|issue| issue.into_rejected(row))
    }

    fn build_record(&self, row: &RawRow) -> std::result::Result<EquipmentRecord, FieldIssue> {
        let name = equipment_name(row, columns::NAME)?;
        let equipment_type = required_text(row, columns::TYPE)?;
        let flowrate = required_reading(row, columns::FLOWRATE)?;
        let pressure = required_reading(row, columns::PRESSURE)?;
        let temperature = required_reading(row, columns::TEMPERATURE)?;

        Ok(EquipmentRecord {
            name: name.to_string(),
            equipment_type: equipment_type.to_string(),
            flowrate,
            pressure,
            temperature,
        })
    }
}

fn rejected_malformed(malformed: MalformedRow) -> RejectedRow {
    RejectedRow {
        row_index: malformed.row_index,
        raw_fields: malformed.raw_fields,
        reason: RejectReason::MalformedRow,
        column: None,
        message: malformed.message,
    }
}

fn describe_fields(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={:?}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}
