//! Threshold warnings for validated equipment records
//!
//! Readings strictly above the safe limits produce one [`Warning`] per kind,
//! each listing the offending records in input order. Warnings are data on
//! the summary, never errors.
//!
//! Only individual records are checked. An average can never exceed the
//! largest reading it is computed from, so it cannot flag anything a record
//! has not already flagged.

use crate::app::models::{EquipmentRecord, Warning, WarningKind};
use tracing::warn;

/// Evaluate all warning kinds, `pressure_high` first
pub fn evaluate(records: &[EquipmentRecord]) -> Vec<Warning> {
    WarningKind::ALL
        .iter()
        .filter_map(|kind| evaluate_kind(*kind, records))
        .collect()
}

/// Evaluate a single warning kind; `None` when no record exceeds its limit
pub fn evaluate_kind(kind: WarningKind, records: &[EquipmentRecord]) -> Option<Warning> {
    let metric = kind.metric();
    let details: Vec<String> = records
        .iter()
        .filter(|record| exceeds(kind, record))
        .map(|record| format_detail(&record.name, record.reading(metric), metric.unit()))
        .collect();

    if details.is_empty() {
        return None;
    }

    warn!("{}: {} record(s) above {}", kind, details.len(), kind.limit());

    Some(Warning {
        kind,
        message: kind.message().to_string(),
        details,
    })
}

/// True when the record's reading is strictly above the kind's limit
pub fn exceeds(kind: WarningKind, record: &EquipmentRecord) -> bool {
    record.reading(kind.metric()) > kind.limit()
}

/// `P-101: 11.0 bar`
fn format_detail(name: &str, value: f64, unit: &str) -> String {
    format!("{}: {} {}", name, format_reading(value), unit)
}

/// Plain decimal notation; whole numbers keep one decimal place
pub fn format_reading(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}
