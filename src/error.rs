//! Error types for the payroll ingestion engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can stop an import, plus the error returned by
//! record sinks at the persistence boundary.

use thiserror::Error;

use crate::models::CanonicalField;

/// The main error type for the ingestion engine.
///
/// Configuration errors surface while loading the alias catalog. Sheet-level
/// errors (`HeaderNotFound`, `MissingMandatoryColumn`) are fatal for a single
/// import and are raised before any row is touched.
///
/// # Example
///
/// ```
/// use payroll_ingest::error::EngineError;
///
/// let error = EngineError::HeaderNotFound { scanned_rows: 50 };
/// assert_eq!(
///     error.to_string(),
///     "Header row not found in the first 50 rows"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Two alias entries accept the same label and are not a valid
    /// income/deduction pair.
    #[error("Alias '{alias}' is claimed by both {first} and {second}")]
    AliasConflict {
        /// The normalized alias text.
        alias: String,
        /// The field that claimed the alias first.
        first: CanonicalField,
        /// The field that claimed it again.
        second: CanonicalField,
    },

    /// An alias entry is malformed.
    #[error("Invalid alias entry for {field}: {message}")]
    InvalidAlias {
        /// The field whose entry is invalid.
        field: CanonicalField,
        /// What is wrong with it.
        message: String,
    },

    /// No row containing both anchor columns was found.
    #[error("Header row not found in the first {scanned_rows} rows")]
    HeaderNotFound {
        /// How many rows were scanned.
        scanned_rows: usize,
    },

    /// A mandatory column could not be resolved in the header.
    #[error("Mandatory column missing: {field}")]
    MissingMandatoryColumn {
        /// The field that could not be resolved.
        field: CanonicalField,
    },

    /// The spreadsheet could not be decoded.
    #[error("Failed to read workbook: {message}")]
    Workbook {
        /// A description of the decoding failure.
        message: String,
    },

    /// An all-or-nothing import hit a persistence failure and was rolled back.
    #[error("Import rolled back at row {row}: {message}")]
    BatchRolledBack {
        /// Zero-based grid row of the record that failed.
        row: usize,
        /// The persistence error message.
        message: String,
    },

    /// The sink refused to commit an all-or-nothing import.
    #[error("Failed to commit import: {message}")]
    CommitFailed {
        /// The persistence error message.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error returned by a record sink when a single record cannot be stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PersistError {
    /// A description of the storage failure.
    pub message: String,
}

impl PersistError {
    /// Creates a persistence error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
