//! Core CSV parser implementation
//!
//! This module handles delimiter detection, header validation and the lazy
//! row iterator handed to the record validator.

use std::collections::BTreeMap;
use tracing::{debug, info};

use super::column_mapping::ColumnMapping;
use crate::config::IngestConfig;
use crate::constants::{CANDIDATE_DELIMITERS, DEFAULT_DELIMITER, UTF8_BOM};
use crate::{Error, Result};

/// One data row, values keyed by column
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based data row index
    pub row_index: usize,

    /// Untrimmed field values keyed by canonical column (or header for extras)
    pub fields: BTreeMap<String, String>,
}

impl RawRow {
    /// Raw value for a column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// A data row whose shape could not be reconciled with the header
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRow {
    /// 1-based data row index
    pub row_index: usize,

    /// Whatever fields could be recovered
    pub raw_fields: BTreeMap<String, String>,

    /// What was wrong with the row
    pub message: String,
}

/// CSV parser for equipment uploads
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    config: IngestConfig,
}

impl CsvParser {
    /// Create a new parser with ingest configuration
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Parse upload bytes into a lazy row sequence
    ///
    /// Fails with `EmptyFile` when there is no content or no data rows, and
    /// with `HeaderMissing` when required columns cannot be matched.
    pub fn parse<'a>(&self, bytes: &'a [u8], file: &str) -> Result<ParsedRows<'a>> {
        let bytes = bytes.strip_prefix(UTF8_BOM.as_bytes()).unwrap_or(bytes);

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(Error::empty_file(file, "no content"));
        }

        let delimiter = match self.config.delimiter_byte()? {
            Some(delimiter) => delimiter,
            None => sniff_delimiter(bytes),
        };
        debug!("Using delimiter {:?} for {}", delimiter as char, file);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| Error::csv_parsing(file, "Failed to read CSV header row", Some(e)))?
            .clone();

        let mapping = ColumnMapping::analyze(&headers, &self.config.column_aliases, file)?;
        debug!(
            "Column mapping for {}: {} columns, extras: {:?}",
            file,
            mapping.width(),
            mapping.extra_columns()
        );

        let mut rows = ParsedRows {
            records: reader.into_records(),
            mapping,
            lookahead: None,
            next_index: 1,
        };

        if !rows.has_data() {
            return Err(Error::empty_file(file, "header present but no data rows"));
        }

        info!("Parsing {} ({} columns)", file, rows.mapping.width());
        Ok(rows)
    }
}

/// Lazy sequence of parsed rows
pub struct ParsedRows<'a> {
    records: csv::StringRecordsIntoIter<&'a [u8]>,
    mapping: ColumnMapping,
    lookahead: Option<csv::Result<csv::StringRecord>>,
    next_index: usize,
}

impl ParsedRows<'_> {
    /// Header analysis for this upload
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    fn has_data(&mut self) -> bool {
        if self.lookahead.is_none() {
            self.lookahead = self.next_record();
        }
        self.lookahead.is_some()
    }

    /// Next record, skipping lines with no content at all
    fn next_record(&mut self) -> Option<csv::Result<csv::StringRecord>> {
        if let Some(pending) = self.lookahead.take() {
            return Some(pending);
        }

        for result in self.records.by_ref() {
            match &result {
                Ok(record) if is_blank(record) => continue,
                _ => return Some(result),
            }
        }
        None
    }

    fn to_row(
        &self,
        row_index: usize,
        record: &csv::StringRecord,
    ) -> std::result::Result<RawRow, MalformedRow> {
        let width = self.mapping.width();
        let fields: BTreeMap<String, String> = self
            .mapping
            .keys
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();

        // Trailing empty cells (a dangling delimiter) are tolerated
        let overflow_has_content = record.iter().skip(width).any(|v| !v.trim().is_empty());

        if record.len() < width || overflow_has_content {
            return Err(MalformedRow {
                row_index,
                raw_fields: fields,
                message: format!("{} field(s), expected {}", record.len(), width),
            });
        }

        Ok(RawRow { row_index, fields })
    }
}

impl Iterator for ParsedRows<'_> {
    type Item = std::result::Result<RawRow, MalformedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.next_record()?;
        let row_index = self.next_index;
        self.next_index += 1;

        Some(match result {
            Ok(record) => self.to_row(row_index, &record),
            Err(e) => Err(MalformedRow {
                row_index,
                raw_fields: BTreeMap::new(),
                message: e.to_string(),
            }),
        })
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|v| v.trim().is_empty())
}

/// Pick the candidate delimiter that occurs most often in the header line.
///
/// Quoted sections are ignored. Ties go to the earlier candidate, so a
/// header without any candidate falls back to a comma.
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header_line = bytes
        .split(|b| *b == b'\n')
        .find(|line| line.iter().any(|b| !b.is_ascii_whitespace()))
        .unwrap_or(&[]);

    let mut counts = [0usize; 256];
    let mut in_quotes = false;
    for &b in header_line {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            counts[b as usize] += 1;
        }
    }

    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .fold((DEFAULT_DELIMITER, 0usize), |best, candidate| {
            let count = counts[candidate as usize];
            if count > best.1 { (candidate, count) } else { best }
        })
        .0
}
