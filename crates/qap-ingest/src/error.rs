//! Error types for QAP results ingestion.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a results table.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Header row lacks a column every row must provide.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

impl IngestError {
    fn from_csv(path: &Path, err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Self::FileNotFound {
                    path: path.to_path_buf(),
                }
            }
            csv::ErrorKind::Io(source) => Self::FileRead {
                path: path.to_path_buf(),
                source,
            },
            _ => Self::CsvParse {
                path: path.to_path_buf(),
                message,
            },
        }
    }

    /// Adapter for `map_err` that attaches the file path.
    pub(crate) fn csv(path: &Path) -> impl FnOnce(csv::Error) -> Self + '_ {
        move |err| Self::from_csv(path, err)
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
