//! Tests for the record validator module

pub mod stats_tests;
pub mod validator_tests;

// Test helper functions and fixtures
use crate::app::services::csv_parser::{MalformedRow, RawRow};
use std::collections::BTreeMap;

/// Create a raw row from `(name, type, flowrate, pressure, temperature)` text
pub fn create_raw_row(row_index: usize, values: [&str; 5]) -> RawRow {
    let fields = ["name", "type", "flowrate", "pressure", "temperature"]
        .iter()
        .zip(values)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    RawRow { row_index, fields }
}

/// Create a malformed row carrying only a name
pub fn create_malformed_row(row_index: usize) -> MalformedRow {
    let mut raw_fields = BTreeMap::new();
    raw_fields.insert("name".to_string(), "X-1".to_string());

    MalformedRow {
        row_index,
        raw_fields,
        message: "2 field(s), expected 5".to_string(),
    }
}
