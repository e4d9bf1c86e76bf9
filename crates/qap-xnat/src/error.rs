//! Error types for repository access.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the repository or writing documents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum XnatError {
    /// Credentials are not in `user:password` form.
    #[error("invalid credentials: expected 'user:password'")]
    InvalidCredentials,

    /// Host is not a usable base URL.
    #[error("invalid host URL '{host}': {message}")]
    InvalidHost { host: String, message: String },

    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with an unexpected status.
    #[error("request to {url} failed with status {status}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    /// Failed to parse a JSON response.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The session has no scan with the requested ID.
    #[error("scan {scan_id} not found in session {session}")]
    ScanNotFound { session: String, scan_id: String },

    /// The session lists the scan ID more than once.
    #[error("scan {scan_id} matches {count} scans in session {session}")]
    AmbiguousScan {
        session: String,
        scan_id: String,
        count: usize,
    },

    /// An assessment with the same label is already stored.
    #[error("assessment {label} already exists")]
    AlreadyExists { label: String },

    /// I/O error while writing a document.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl XnatError {
    /// Returns whether the record was skipped because its assessment exists.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

impl From<reqwest::Error> for XnatError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for XnatError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, XnatError>;
