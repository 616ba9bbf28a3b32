//! Equipment Ingest Library
//!
//! Turns chemical plant equipment sensor CSV uploads into quality-checked
//! summaries and relates each summary to the uploads before it.
//!
//! This library provides tools for:
//! - Parsing untrusted CSV bytes with case-insensitive, alias-aware headers
//! - Validating rows into typed equipment records, keeping rejected rows
//! - Aggregating totals, averages and the equipment type distribution
//! - Flagging readings above safe pressure and temperature thresholds
//! - Storing summaries in an append-only, concurrently readable history
//! - Comparing the two most recent summaries as percentage trends

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aggregator;
        pub mod csv_parser;
        pub mod history_store;
        pub mod pipeline;
        pub mod record_validator;
        pub mod report;
        pub mod trend_comparator;
        pub mod warning_engine;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    EquipmentRecord, PendingSummary, RejectReason, RejectedRow, UploadSummary, Warning,
    WarningKind,
};
pub use app::services::history_store::{HistoryStore, InMemoryHistoryStore};
pub use app::services::pipeline::{UploadOutcome, UploadPipeline};
pub use config::Config;

/// Result type alias for the equipment ingest engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ingest, history and configuration operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader could not make sense of the input
    #[error("CSV parsing error in '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// No content, or a header with no data rows
    #[error("File '{file}' is empty: {reason}")]
    EmptyFile { file: String, reason: String },

    /// Required columns could not be found in the header
    #[error("File '{file}' is missing required column(s): {}", missing.join(", "))]
    HeaderMissing { file: String, missing: Vec<String> },

    /// A data row could not be reconciled with the header
    #[error("Malformed row {row_index} in '{file}': {message}")]
    MalformedRow {
        file: String,
        row_index: usize,
        message: String,
    },

    /// Every data row was rejected during validation
    #[error("No valid equipment records in '{file}': all {rejected} data row(s) were rejected")]
    NoValidRecords { file: String, rejected: usize },

    /// History lookup for an unknown upload
    #[error("No such upload: {uploaded_at}")]
    NotFound { uploaded_at: String },

    /// A value violated a record invariant
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON (de)serialization failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The run was stopped by the user
    #[error("Interrupted: {message}")]
    Interrupted { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an empty file error
    pub fn empty_file(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EmptyFile {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing header error
    pub fn header_missing(file: impl Into<String>, missing: Vec<String>) -> Self {
        Self::HeaderMissing {
            file: file.into(),
            missing,
        }
    }

    /// Create a malformed row error
    pub fn malformed_row(
        file: impl Into<String>,
        row_index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedRow {
            file: file.into(),
            row_index,
            message: message.into(),
        }
    }

    /// Create an error for an upload where nothing validated
    pub fn no_valid_records(file: impl Into<String>, rejected: usize) -> Self {
        Self::NoValidRecords {
            file: file.into(),
            rejected,
        }
    }

    /// Create a not found error for a history lookup
    pub fn not_found(uploaded_at: impl Into<String>) -> Self {
        Self::NotFound {
            uploaded_at: uploaded_at.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create an interruption error
    pub fn interrupted(message: impl Into<String>) -> Self {
        Self::Interrupted {
            message: message.into(),
        }
    }

    /// True for failures where the file itself could not be processed
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::CsvParsing { .. }
                | Self::EmptyFile { .. }
                | Self::HeaderMissing { .. }
                | Self::MalformedRow { .. }
        )
    }

    /// True when an upload failed and nothing was stored
    pub fn is_upload_failure(&self) -> bool {
        self.is_structural() || matches!(self, Self::NoValidRecords { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: constants::UNNAMED_UPLOAD.to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::empty_file("a.csv", "no content").is_structural());
        assert!(Error::header_missing("a.csv", vec!["name".to_string()]).is_structural());
        assert!(Error::malformed_row("a.csv", 3, "2 fields, expected 5").is_structural());

        let no_valid = Error::no_valid_records("a.csv", 4);
        assert!(!no_valid.is_structural());
        assert!(no_valid.is_upload_failure());

        let missing = Error::not_found("2024-01-01T00:00:00Z");
        assert!(!missing.is_structural());
        assert!(!missing.is_upload_failure());
    }

    #[test]
    fn test_error_messages_are_specific() {
        let err = Error::header_missing(
            "plant.csv",
            vec!["pressure".to_string(), "temperature".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "File 'plant.csv' is missing required column(s): pressure, temperature"
        );

        let err = Error::no_valid_records("plant.csv", 3);
        assert!(err.to_string().contains("all 3 data row(s) were rejected"));

        let err = Error::not_found("2024-05-01T10:00:00Z");
        assert_eq!(err.to_string(), "No such upload: 2024-05-01T10:00:00Z");
    }
}
