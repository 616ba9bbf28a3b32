//! Row statistics for one validated upload

use crate::app::models::RejectReason;
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics for record validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestStats {
    /// Data rows seen (header excluded, blank lines skipped)
    pub total_rows: usize,
    /// Rows that became equipment records
    pub valid_records: usize,
    /// Rows that were rejected
    pub rejected_rows: usize,
    /// Rejected rows per reason code
    pub rejected_by_reason: BTreeMap<RejectReason, usize>,
}

impl IngestStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            total_rows: 0,
            valid_records: 0,
            rejected_rows: 0,
            rejected_by_reason: BTreeMap::new(),
        }
    }

    /// Count a row that validated
    pub fn record_valid(&mut self) {
        self.total_rows += 1;
        self.valid_records += 1;
    }

    /// Count a rejected row under its reason
    pub fn record_rejected(&mut self, reason: RejectReason) {
        self.total_rows += 1;
        self.rejected_rows += 1;
        *self.rejected_by_reason.entry(reason).or_insert(0) += 1;
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            100.0
        } else {
            (self.valid_records as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Check if validation was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }

    /// Rejections recorded for one reason
    pub fn rejected_for(&self, reason: RejectReason) -> usize {
        self.rejected_by_reason.get(&reason).copied().unwrap_or(0)
    }

    /// Get a one-line summary
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Validated {}/{} rows ({:.1}% success)",
            self.valid_records,
            self.total_rows,
            self.success_rate()
        );

        if self.rejected_rows > 0 {
            let reasons: Vec<String> = self
                .rejected_by_reason
                .iter()
                .map(|(reason, count)| format!("{} {}", count, reason))
                .collect();
            summary.push_str(&format!(", rejected: {}", reasons.join(", ")));
        }

        summary
    }
}

impl Default for IngestStats {
    fn default() -> Self {
        Self::new()
    }
}
