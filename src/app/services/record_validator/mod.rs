//! Record validation for parsed equipment rows
//!
//! Turns the rows produced by the CSV parser into typed [`EquipmentRecord`]s.
//! Every row that cannot become a record is kept as a [`RejectedRow`] with a
//! reason code; a single bad row never aborts the upload. Only two outcomes
//! are fatal:
//!
//! - every data row was rejected (`Error::NoValidRecords`)
//! - a malformed row was seen while `strict_structure` is enabled
//!   (`Error::MalformedRow`)
//!
//! # Architecture
//!
//! - [`validator`] - RecordValidator and the per-row decision
//! - [`field_parsers`] - Trimming and plain-decimal parsing of single fields
//! - [`stats`] - Row counts and per-reason rejection tallies
//!
//! [`EquipmentRecord`]: crate::app::models::EquipmentRecord
//! [`RejectedRow`]: crate::app::models::RejectedRow

pub mod field_parsers;
pub mod stats;
pub mod validator;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use field_parsers::{FieldIssue, parse_plain_decimal};
pub use stats::IngestStats;
pub use validator::{RecordValidator, ValidationResult};
