//! Field parsing utilities for equipment rows
//!
//! Helpers that pull one trimmed value out of a [`RawRow`] and either return
//! it typed or describe why the row has to be rejected.

use crate::app::models::{RejectReason, RejectedRow};
use crate::app::services::csv_parser::RawRow;

/// Why a single field stopped a row from becoming a record
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub reason: RejectReason,
    pub column: &'static str,
    pub message: String,
}

impl FieldIssue {
    fn new(reason: RejectReason, column: &'static str, message: String) -> Self {
        Self {
            reason,
            column,
            message,
        }
    }

    /// Attach the issue to the row it came from
    pub fn into_rejected(self, row: &RawRow) -> RejectedRow {
        RejectedRow {
            row_index: row.row_index,
            raw_fields: row.fields.clone(),
            reason: self.reason,
            column: Some(self.column.to_string()),
            message: self.message,
        }
    }
}

/// Trimmed value of a required text field; blank counts as missing
pub fn required_text<'a>(
    row: &'a RawRow,
    column: &'static str,
) -> std::result::Result<&'a str, FieldIssue> {
    match row.get(column).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(FieldIssue::new(
            RejectReason::MissingField,
            column,
            format!("Required field '{}' is empty", column),
        )),
    }
}

/// Trimmed equipment name, which must not be blank
pub fn equipment_name<'a>(
    row: &'a RawRow,
    column: &'static str,
) -> std::result::Result<&'a str, FieldIssue> {
    match row.get(column) {
        None => Err(FieldIssue::new(
            RejectReason::MissingField,
            column,
            format!("Required field '{}' is absent", column),
        )),
        Some(value) if value.trim().is_empty() => Err(FieldIssue::new(
            RejectReason::EmptyName,
            column,
            "Equipment name is empty".to_string(),
        )),
        Some(value) => Ok(value.trim()),
    }
}

/// A required numeric reading
pub fn required_reading(
    row: &RawRow,
    column: &'static str,
) -> std::result::Result<f64, FieldIssue> {
    let value = required_text(row, column)?;

    parse_plain_decimal(value).ok_or_else(|| {
        FieldIssue::new(
            RejectReason::NotNumeric,
            column,
            format!("Invalid number for {}: '{}'", column, value),
        )
    })
}

/// Parse a locale-agnostic decimal.
///
/// Grouping separators are refused rather than guessed at, and so are
/// `NaN` and infinities.
pub fn parse_plain_decimal(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() || value.contains([',', '_', ' ']) {
        return None;
    }

    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
