//! Error types for extract ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an extract.
///
/// All of these are fatal for the run: the pipeline never proceeds with a
/// partially-loaded extract.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Extract file not found.
    #[error("extract file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the extract file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the delimited content.
    #[error("failed to parse {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// The extract has a header but zero data rows.
    #[error("extract is empty: {path}")]
    EmptySource { path: PathBuf },

    /// A required column is absent; lists what the file actually offers.
    #[error("required column '{column}' not found in {path} (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        path: PathBuf,
        available: Vec<String>,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
