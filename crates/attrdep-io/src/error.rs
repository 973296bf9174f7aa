//! Error types for mapping table and document I/O.

use std::path::PathBuf;

use attrdep_model::{ModelError, SchemaError, Side, ValueError};
use thiserror::Error;

/// Errors that can occur while reading or writing mapping tables and
/// documents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    // === File System Errors ===
    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stream error without a known path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The file extension does not name a mapping table format.
    #[error("cannot determine mapping table format of {path} (expected .csv, .tsv, .tab or .txt)")]
    UnknownFormat { path: PathBuf },

    // === Table Errors ===
    /// Low-level CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The table has no header row.
    #[error("mapping table has no header row")]
    MissingHeader,

    /// A header column does not name the expected attribute.
    #[error("header column {column}: expected '{expected}', found '{found}'")]
    HeaderMismatch {
        column: usize,
        expected: String,
        found: String,
    },

    /// A data row has the wrong number of fields.
    #[error("line {line}: expected {expected} fields but found {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A cell could not be parsed for its attribute's field type.
    #[error("line {line}, column {column}: {source}")]
    Value {
        line: u64,
        column: String,
        #[source]
        source: ValueError,
    },

    // === Text Format Errors ===
    /// A rule line is not `source => target [# description]`.
    #[error("line {line}: invalid syntax, expected 'source => target'")]
    Syntax { line: u64 },

    /// A value list on a rule line could not be parsed.
    #[error("line {line}: invalid {side} values: {source}")]
    ValueList {
        line: u64,
        side: Side,
        #[source]
        source: ValueError,
    },

    /// A rule line has the wrong number of values on one side.
    #[error("line {line}: expected {expected} {side} values, but got {actual}")]
    Arity {
        line: u64,
        side: Side,
        expected: usize,
        actual: usize,
    },

    // === Document Errors ===
    /// Failed to parse or serialize a JSON document.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The schema document is inconsistent.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The rule set rejected the imported mappings.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
