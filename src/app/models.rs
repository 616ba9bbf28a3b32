//! Data models for equipment sensor ingestion
//!
//! This module contains the core data structures flowing through the engine:
//! validated equipment records, rejected rows, threshold warnings and the
//! upload summaries kept in history.

use crate::constants::{PRESSURE_LIMIT_BAR, TEMPERATURE_LIMIT_CELSIUS, units};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Equipment Records
// =============================================================================

/// One validated row of sensor readings for a single piece of plant equipment
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EquipmentRecord {
    /// Equipment identifier, never empty after trimming
    pub name: String,

    /// Category label, kept exactly as written (after trimming)
    #[serde(rename = "type")]
    pub equipment_type: String,

    /// Flow rate in m³/h
    pub flowrate: f64,

    /// Pressure in bar
    pub pressure: f64,

    /// Temperature in °C
    pub temperature: f64,
}

impl EquipmentRecord {
    /// Create a record, rejecting empty names and non-finite readings
    pub fn new(
        name: impl Into<String>,
        equipment_type: impl Into<String>,
        flowrate: f64,
        pressure: f64,
        temperature: f64,
    ) -> Result<Self> {
        let record = Self {
            name: name.into(),
            equipment_type: equipment_type.into(),
            flowrate,
            pressure,
            temperature,
        };

        record.validate()?;
        Ok(record)
    }

    /// Check the record invariants
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::data_validation(
                "Equipment record name must not be empty",
            ));
        }

        for metric in Metric::ALL {
            let value = self.reading(metric);
            if !value.is_finite() {
                return Err(Error::data_validation(format!(
                    "Equipment '{}' has a non-finite {} reading: {}",
                    self.name,
                    metric.label(),
                    value
                )));
            }
        }

        Ok(())
    }

    /// Reading for the given metric
    pub fn reading(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Flowrate => self.flowrate,
            Metric::Pressure => self.pressure,
            Metric::Temperature => self.temperature,
        }
    }
}

/// The three averaged sensor metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Flowrate,
    Pressure,
    Temperature,
}

impl Metric {
    /// All metrics in reporting order
    pub const ALL: [Metric; 3] = [Metric::Flowrate, Metric::Pressure, Metric::Temperature];

    /// Column-style label
    pub fn label(self) -> &'static str {
        match self {
            Metric::Flowrate => "flowrate",
            Metric::Pressure => "pressure",
            Metric::Temperature => "temperature",
        }
    }

    /// Unit the readings are expressed in
    pub fn unit(self) -> &'static str {
        match self {
            Metric::Flowrate => units::FLOWRATE,
            Metric::Pressure => units::PRESSURE,
            Metric::Temperature => units::TEMPERATURE,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Rejected Rows
// =============================================================================

/// Why a data row did not become an [`EquipmentRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// A required field was absent or blank
    MissingField,

    /// A numeric field did not parse as a finite plain decimal
    NotNumeric,

    /// The equipment name was blank after trimming
    EmptyName,

    /// The row's field count did not match the header
    MalformedRow,
}

impl RejectReason {
    /// Stable reason code
    pub fn code(self) -> &'static str {
        match self {
            RejectReason::MissingField => "MISSING_FIELD",
            RejectReason::NotNumeric => "NOT_NUMERIC",
            RejectReason::EmptyName => "EMPTY_NAME",
            RejectReason::MalformedRow => "MALFORMED_ROW",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A data row that failed validation; never participates in aggregation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RejectedRow {
    /// 1-based index of the data row (the header is not counted)
    pub row_index: usize,

    /// Raw field values keyed by column name
    pub raw_fields: BTreeMap<String, String>,

    /// Reason code
    pub reason: RejectReason,

    /// Column that triggered the rejection, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Human-readable explanation
    pub message: String,
}

// =============================================================================
// Warnings
// =============================================================================

/// Closed set of threshold warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    PressureHigh,
    TemperatureOutOfRange,
}

impl WarningKind {
    /// All kinds in the order warnings are emitted
    pub const ALL: [WarningKind; 2] = [WarningKind::PressureHigh, WarningKind::TemperatureOutOfRange];

    /// Stable type code
    pub fn code(self) -> &'static str {
        match self {
            WarningKind::PressureHigh => "pressure_high",
            WarningKind::TemperatureOutOfRange => "temperature_out_of_range",
        }
    }

    /// Metric the warning watches
    pub fn metric(self) -> Metric {
        match self {
            WarningKind::PressureHigh => Metric::Pressure,
            WarningKind::TemperatureOutOfRange => Metric::Temperature,
        }
    }

    /// Upper limit; readings strictly above it trigger the warning
    pub fn limit(self) -> f64 {
        match self {
            WarningKind::PressureHigh => PRESSURE_LIMIT_BAR,
            WarningKind::TemperatureOutOfRange => TEMPERATURE_LIMIT_CELSIUS,
        }
    }

    /// Summary message shown with the warning
    pub fn message(self) -> &'static str {
        match self {
            WarningKind::PressureHigh => {
                "One or more equipment units exceed safe pressure threshold (10 bar)."
            }
            WarningKind::TemperatureOutOfRange => {
                "One or more equipment units exceed safe temperature threshold (150 °C)."
            }
        }
    }
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A non-fatal, threshold-triggered annotation on a summary
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Warning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub message: String,
    /// One line per offending record, in input order
    pub details: Vec<String>,
}

// =============================================================================
// Upload Summaries
// =============================================================================

/// A summary that has been built but not yet stored.
///
/// The history store turns it into an [`UploadSummary`] by assigning the
/// `uploaded_at` identity.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSummary {
    pub filename: Option<String>,
    pub total_equipment: usize,
    pub average_flowrate: Option<f64>,
    pub average_pressure: Option<f64>,
    pub average_temperature: Option<f64>,
    pub equipment_type_distribution: BTreeMap<String, usize>,
    pub validation_warnings: Vec<Warning>,
    pub rejected_rows: usize,
    pub equipment: Option<Vec<EquipmentRecord>>,
}

/// The aggregated, warning-annotated result of processing one CSV file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadSummary {
    /// Assigned by the history store; strictly increasing and unique
    pub uploaded_at: DateTime<Utc>,

    /// Name of the uploaded file, when the caller supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Count of valid records
    pub total_equipment: usize,

    /// Means over valid records; absent when `total_equipment == 0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_flowrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_temperature: Option<f64>,

    /// Record count per exact type label
    pub equipment_type_distribution: BTreeMap<String, usize>,

    /// Threshold warnings, `pressure_high` before `temperature_out_of_range`
    pub validation_warnings: Vec<Warning>,

    /// Number of data rows rejected during validation
    #[serde(default)]
    pub rejected_rows: usize,

    /// Full record list, kept according to the retention policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<EquipmentRecord>>,
}

impl UploadSummary {
    /// Stamp a pending summary with its identity
    pub fn from_pending(uploaded_at: DateTime<Utc>, pending: PendingSummary) -> Self {
        Self {
            uploaded_at,
            filename: pending.filename,
            total_equipment: pending.total_equipment,
            average_flowrate: pending.average_flowrate,
            average_pressure: pending.average_pressure,
            average_temperature: pending.average_temperature,
            equipment_type_distribution: pending.equipment_type_distribution,
            validation_warnings: pending.validation_warnings,
            rejected_rows: pending.rejected_rows,
            equipment: pending.equipment,
        }
    }

    /// Identity rendered the way the history interface accepts it
    pub fn id(&self) -> String {
        format_upload_id(&self.uploaded_at)
    }

    /// Average for the given metric
    pub fn average(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Flowrate => self.average_flowrate,
            Metric::Pressure => self.average_pressure,
            Metric::Temperature => self.average_temperature,
        }
    }

    /// Copy of this summary with the equipment list dropped
    pub fn without_equipment(&self) -> Self {
        Self {
            equipment: None,
            ..self.clone()
        }
    }

    /// True when the summary carries at least one warning
    pub fn has_warnings(&self) -> bool {
        !self.validation_warnings.is_empty()
    }
}

/// Render an upload id as RFC 3339 with microsecond precision
pub fn format_upload_id(uploaded_at: &DateTime<Utc>) -> String {
    uploaded_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an upload id; anything unparseable cannot name a stored upload
pub fn parse_upload_id(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::not_found(value.trim()))
}
