//! Column mapping for equipment CSV headers
//!
//! This module matches header cells against the configured aliases of each
//! canonical column. Matching ignores case and surrounding whitespace; the
//! first header that matches a column wins.

use crate::config::ColumnAliases;
use crate::constants::{UTF8_BOM, columns};
use crate::{Error, Result};
use csv::StringRecord;
use std::collections::HashMap;

/// Header analysis result for one upload
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Key each column's values are stored under, by position
    pub keys: Vec<String>,

    /// Canonical column name to header index
    pub canonical_to_index: HashMap<&'static str, usize>,
}

/// Normalize a header cell or alias for comparison
pub fn normalize_header(value: &str) -> String {
    value
        .trim()
        .trim_start_matches(UTF8_BOM)
        .trim()
        .to_lowercase()
}

/// Key for a non-canonical column; blank or duplicate-canonical headers get a positional key
fn fallback_key(header: &str, index: usize) -> String {
    if header.is_empty() || columns::REQUIRED.contains(&header) {
        format!("column_{}", index + 1)
    } else {
        header.to_string()
    }
}

impl ColumnMapping {
    /// Match headers against aliases, failing if any required column is absent
    pub fn analyze(headers: &StringRecord, aliases: &ColumnAliases, file: &str) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut canonical_to_index = HashMap::new();
        let mut missing = Vec::new();

        for (canonical, accepted) in aliases.iter() {
            let accepted: Vec<String> = accepted
                .iter()
                .map(|a| normalize_header(a))
                .filter(|a| !a.is_empty())
                .collect();

            let position = normalized
                .iter()
                .enumerate()
                .filter(|(index, _)| !canonical_to_index.values().any(|taken| taken == index))
                .find(|(_, header)| accepted.iter().any(|a| a == *header))
                .map(|(index, _)| index);

            match position {
                Some(index) => {
                    canonical_to_index.insert(canonical, index);
                }
                None => missing.push(canonical.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(Error::header_missing(file, missing));
        }

        // Canonical columns are stored under their canonical name; anything
        // else keeps its normalized header so rejected rows stay readable.
        let keys = normalized
            .iter()
            .enumerate()
            .map(|(index, header)| {
                canonical_to_index
                    .iter()
                    .find(|(_, i)| **i == index)
                    .map(|(canonical, _)| canonical.to_string())
                    .unwrap_or_else(|| fallback_key(header, index))
            })
            .collect();

        Ok(ColumnMapping {
            keys,
            canonical_to_index,
        })
    }

    /// Get the index for a canonical column
    pub fn get_index(&self, canonical: &str) -> Option<usize> {
        self.canonical_to_index.get(canonical).copied()
    }

    /// Number of header columns
    pub fn width(&self) -> usize {
        self.keys.len()
    }

    /// Columns present beyond the required ones
    pub fn extra_columns(&self) -> Vec<&str> {
        self.keys
            .iter()
            .filter(|key| !columns::REQUIRED.contains(&key.as_str()))
            .map(|key| key.as_str())
            .collect()
    }
}
