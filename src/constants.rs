//! Application constants for the equipment ingest engine
//!
//! This module contains the domain thresholds, canonical column names,
//! default header aliases and retention defaults used throughout the crate.

// =============================================================================
// Canonical Columns
// =============================================================================

/// Canonical names of the columns every upload must provide
pub mod columns {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const FLOWRATE: &str = "flowrate";
    pub const PRESSURE: &str = "pressure";
    pub const TEMPERATURE: &str = "temperature";

    /// All required columns, in the order they are reported when missing
    pub const REQUIRED: &[&str] = &[NAME, TYPE, FLOWRATE, PRESSURE, TEMPERATURE];
}

/// Header spellings accepted for each canonical column out of the box.
///
/// Matching is case-insensitive and ignores surrounding whitespace, so only
/// genuinely different spellings need to be listed here. The title-case names
/// are the ones the plant's export tool writes.
pub mod default_aliases {
    pub const NAME: &[&str] = &["name", "equipment name", "equipment_name"];
    pub const TYPE: &[&str] = &["type", "equipment type", "equipment_type"];
    pub const FLOWRATE: &[&str] = &["flowrate", "flow_rate", "flow rate"];
    pub const PRESSURE: &[&str] = &["pressure"];
    pub const TEMPERATURE: &[&str] = &["temperature"];
}

// =============================================================================
// CSV Input
// =============================================================================

/// Delimiters considered when sniffing the header line
pub const CANDIDATE_DELIMITERS: &[u8] = b",;\t|";

/// Fallback delimiter when the header line contains none of the candidates
pub const DEFAULT_DELIMITER: u8 = b',';

/// Byte order mark some spreadsheet exports prepend to the first header
pub const UTF8_BOM: &str = "\u{feff}";

/// Label used in errors and logs when an upload has no filename
pub const UNNAMED_UPLOAD: &str = "<upload>";

// =============================================================================
// Warning Thresholds
// =============================================================================

/// Safe operating pressure in bar; readings strictly above this are flagged
pub const PRESSURE_LIMIT_BAR: f64 = 10.0;

/// Safe operating temperature in °C; readings strictly above this are flagged
pub const TEMPERATURE_LIMIT_CELSIUS: f64 = 150.0;

/// Unit labels used in warning details and human output
pub mod units {
    pub const FLOWRATE: &str = "m³/h";
    pub const PRESSURE: &str = "bar";
    pub const TEMPERATURE: &str = "°C";
}

// =============================================================================
// History and Trends
// =============================================================================

/// Number of summaries kept by default (0 disables eviction)
pub const DEFAULT_MAX_HISTORY_ENTRIES: usize = 5;

/// Trend comparison needs the latest and the previous summary
pub const MIN_HISTORY_ENTRIES: usize = 2;

/// Default number of summaries returned by the history command
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Decimal places kept on trend percentages
pub const TREND_DECIMAL_PLACES: i32 = 2;

/// Decimal places used when rendering averages for people
pub const DISPLAY_DECIMAL_PLACES: usize = 2;

/// Placeholder rendered for an undefined trend delta
pub const UNDEFINED_DELTA: &str = "—";

// =============================================================================
// Configuration and Environment
// =============================================================================

/// Directory name under the platform config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "equipment-ingest";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// History snapshot file name under the platform data dir, used by the CLI
/// when no path is configured
pub const HISTORY_FILE_NAME: &str = "history.json";

/// Environment variable overriding the history snapshot path
pub const ENV_HISTORY_PATH: &str = "EQUIPMENT_INGEST_HISTORY_PATH";

/// Environment variable overriding the history entry cap
pub const ENV_MAX_ENTRIES: &str = "EQUIPMENT_INGEST_MAX_ENTRIES";

/// Environment variable forcing a CSV delimiter
pub const ENV_DELIMITER: &str = "EQUIPMENT_INGEST_DELIMITER";

/// Title placed on report payloads
pub const REPORT_TITLE: &str = "Chemical Equipment Report";
