//! Test utilities for CSV parser testing
//!
//! Shared CSV fixtures and helpers used across the parser test modules.

use super::{CsvParser, MalformedRow, RawRow};
use crate::config::IngestConfig;

mod parser_tests;

/// The header spelling written by the plant's export tool
pub const EXPORT_HEADER: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature";

/// Helper to create a well-formed upload with the export header
pub fn create_export_csv() -> String {
    format!(
        "{}\nP-101,Pump,12.5,11.0,80\nP-102,Pump,10.0,5.0,60\nV-201,Valve,4.2,3.1,45\n",
        EXPORT_HEADER
    )
}

/// Parse with default configuration and collect every row
pub fn parse_all(content: &str) -> Vec<Result<RawRow, MalformedRow>> {
    CsvParser::new(IngestConfig::default())
        .parse(content.as_bytes(), "test.csv")
        .unwrap()
        .collect()
}
