//! Error types for cm-core
//!
//! These are fatal conditions only. A literal that fails validation is not an
//! error: it becomes a [`Rejection`](crate::rules::Rejection) inside the edit
//! outcome and the cell is reverted.

use crate::table::{Column, TableKind};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cm-core
#[derive(Debug, Error)]
pub enum Error {
    /// A DataType token outside the closed catalog reached the engine
    #[error("unknown data type '{0}'")]
    UnknownDataType(String),

    /// An InputType token outside {"", variable, parameter}
    #[error("unknown input type '{0}'")]
    UnknownInputType(String),

    /// Column name not recognized at all
    #[error("unknown column '{0}'")]
    UnknownColumnName(String),

    /// Column exists but not in this table
    #[error("column '{column}' does not belong to the {table} table")]
    ColumnNotInTable { table: TableKind, column: Column },

    /// Row index past the end of a table
    #[error("row {row} out of range for the {table} table ({len} rows)")]
    RowOutOfRange {
        table: TableKind,
        row: usize,
        len: usize,
    },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV content that cannot be mapped onto a table
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// No package files found for a model
    #[error("no files found for model '{0}'")]
    ModelNotFound(String),

    /// A package is missing one of its required tables
    #[error("model '{model}' has no {table} file")]
    MissingPackageFile { model: String, table: TableKind },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
