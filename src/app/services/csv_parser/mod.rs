//! CSV parser for equipment sensor uploads
//!
//! Turns raw upload bytes into a lazy sequence of rows keyed by canonical
//! column name. Structural problems with the file as a whole (no content, no
//! data rows, required columns missing) fail fast; problems with a single row
//! are yielded as [`MalformedRow`] items and left to the record validator.
//!
//! ## Architecture
//!
//! - [`parser`] - Delimiter sniffing, header handling and the row iterator
//! - [`column_mapping`] - Case-insensitive, alias-aware header matching
//!
//! ## Usage
//!
//! ```rust
//! use equipment_ingest::app::services::csv_parser::CsvParser;
//! use equipment_ingest::config::IngestConfig;
//!
//! # fn example() -> equipment_ingest::Result<()> {
//! let bytes = b"Equipment Name,Type,Flowrate,Pressure,Temperature\nP-101,Pump,12.5,11.0,80\n";
//! let parser = CsvParser::new(IngestConfig::default());
//!
//! for row in parser.parse(bytes, "plant.csv")? {
//!     match row {
//!         Ok(raw) => println!("row {}: {:?}", raw.row_index, raw.get("name")),
//!         Err(bad) => println!("row {} malformed: {}", bad.row_index, bad.message),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod column_mapping;
pub mod parser;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::{ColumnMapping, normalize_header};
pub use parser::{CsvParser, MalformedRow, ParsedRows, RawRow, sniff_delimiter};
