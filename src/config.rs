//! Configuration management and validation.
//!
//! Provides configuration structures for CSV ingestion (header aliases,
//! delimiter handling, structural strictness) and history retention, with
//! layered loading from defaults, a TOML file and environment variables.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_MAX_HISTORY_ENTRIES, ENV_DELIMITER,
    ENV_HISTORY_PATH, ENV_MAX_ENTRIES, MIN_HISTORY_ENTRIES, columns, default_aliases,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration for the ingest engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSV parsing and validation settings
    pub ingest: IngestConfig,

    /// History store retention and persistence
    pub history: HistoryConfig,
}

/// Settings for turning uploaded bytes into rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Accepted header spellings per canonical column
    pub column_aliases: ColumnAliases,

    /// Forced delimiter; sniffed from the header line when unset
    pub delimiter: Option<char>,

    /// Abort the upload on the first malformed row instead of rejecting it
    pub strict_structure: bool,
}

/// Header spellings accepted for each canonical column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub name: Vec<String>,
    #[serde(rename = "type")]
    pub equipment_type: Vec<String>,
    pub flowrate: Vec<String>,
    pub pressure: Vec<String>,
    pub temperature: Vec<String>,
}

/// Which stored summaries keep their full equipment list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentRetention {
    /// Only the most recent summary keeps its records
    #[default]
    LatestOnly,
    /// Every summary keeps its records
    All,
    /// No summary keeps its records
    None,
}

/// History store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// JSON snapshot file; history lives only in memory when unset
    pub path: Option<PathBuf>,

    /// Number of summaries kept, oldest evicted first (0 = unbounded)
    pub max_entries: usize,

    /// Equipment list retention policy
    pub equipment_retention: EquipmentRetention,
}

fn owned(aliases: &[&str]) -> Vec<String> {
    aliases.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            name: owned(default_aliases::NAME),
            equipment_type: owned(default_aliases::TYPE),
            flowrate: owned(default_aliases::FLOWRATE),
            pressure: owned(default_aliases::PRESSURE),
            temperature: owned(default_aliases::TEMPERATURE),
        }
    }
}

impl ColumnAliases {
    /// Aliases for a canonical column name
    pub fn for_column(&self, canonical: &str) -> &[String] {
        match canonical {
            columns::NAME => &self.name,
            columns::TYPE => &self.equipment_type,
            columns::FLOWRATE => &self.flowrate,
            columns::PRESSURE => &self.pressure,
            columns::TEMPERATURE => &self.temperature,
            _ => &[],
        }
    }

    /// Iterate `(canonical, aliases)` in required-column order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        columns::REQUIRED
            .iter()
            .map(move |canonical| (*canonical, self.for_column(canonical)))
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            column_aliases: ColumnAliases::default(),
            delimiter: None,
            strict_structure: false,
        }
    }
}

impl IngestConfig {
    /// Force a delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Abort uploads on the first malformed row
    pub fn with_strict_structure(mut self) -> Self {
        self.strict_structure = true;
        self
    }

    /// Add an extra accepted spelling for a canonical column
    pub fn with_alias(mut self, canonical: &str, alias: impl Into<String>) -> Result<Self> {
        let alias = alias.into();
        let target = match canonical {
            columns::NAME => &mut self.column_aliases.name,
            columns::TYPE => &mut self.column_aliases.equipment_type,
            columns::FLOWRATE => &mut self.column_aliases.flowrate,
            columns::PRESSURE => &mut self.column_aliases.pressure,
            columns::TEMPERATURE => &mut self.column_aliases.temperature,
            other => {
                return Err(Error::configuration(format!(
                    "Unknown column '{}': expected one of {}",
                    other,
                    columns::REQUIRED.join(", ")
                )));
            }
        };
        target.push(alias);
        Ok(self)
    }

    /// Delimiter as the single byte the CSV reader needs
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.delimiter {
            None => Ok(None),
            Some(c) if c.is_ascii() => Ok(Some(c as u8)),
            Some(c) => Err(Error::configuration(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                c
            ))),
        }
    }

    /// Validate alias lists and delimiter
    pub fn validate(&self) -> Result<()> {
        for (canonical, aliases) in self.column_aliases.iter() {
            if aliases.iter().all(|a| a.trim().is_empty()) {
                return Err(Error::configuration(format!(
                    "Column '{}' has no usable header aliases",
                    canonical
                )));
            }
        }

        if let Some(delimiter) = self.delimiter_byte()? {
            if delimiter == b'"' || delimiter == b'\n' || delimiter == b'\r' {
                return Err(Error::configuration(format!(
                    "Delimiter {:?} cannot be used to separate fields",
                    delimiter as char
                )));
            }
        }

        Ok(())
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_entries: DEFAULT_MAX_HISTORY_ENTRIES,
            equipment_retention: EquipmentRetention::LatestOnly,
        }
    }
}

impl HistoryConfig {
    /// Persist history to a JSON snapshot file
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the entry cap (0 = unbounded)
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the equipment retention policy
    pub fn with_equipment_retention(mut self, retention: EquipmentRetention) -> Self {
        self.equipment_retention = retention;
        self
    }

    /// Trend comparison needs the two most recent summaries to survive eviction
    pub fn validate(&self) -> Result<()> {
        if self.max_entries != 0 && self.max_entries < MIN_HISTORY_ENTRIES {
            return Err(Error::configuration(format!(
                "history.max_entries must be 0 (unbounded) or at least {}, got {}",
                MIN_HISTORY_ENTRIES, self.max_entries
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Default location: `<config_dir>/equipment-ingest/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine the user config directory"))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid configuration file: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration using layered approach (defaults -> file -> env)
    ///
    /// Command-line overrides are applied by the caller afterwards.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_HISTORY_PATH).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides history path", ENV_HISTORY_PATH);
            self.history.path = Some(PathBuf::from(path.trim()));
        }

        if let Some(raw) = lookup(ENV_MAX_ENTRIES) {
            self.history.max_entries = raw.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a non-negative integer, got '{}'",
                    ENV_MAX_ENTRIES, raw
                ))
            })?;
        }

        if let Some(raw) = lookup(ENV_DELIMITER) {
            self.ingest.delimiter = Some(parse_delimiter(&raw)?);
        }

        Ok(())
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        self.ingest.validate()?;
        self.history.validate()
    }
}

/// Parse a delimiter given on the command line or in the environment.
///
/// Accepts a single character or the escape `\t`.
pub fn parse_delimiter(raw: &str) -> Result<char> {
    if raw == "\\t" || raw == "tab" {
        return Ok('\t');
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::configuration(format!(
            "Delimiter must be a single character, got '{}'",
            raw
        ))),
    }
}
