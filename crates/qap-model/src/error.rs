//! Error types for the QAP assessment model.

use thiserror::Error;

/// Errors raised while selecting schemas, coercing values, or deriving scan identity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Schema identifier is not one of the registered assessment types.
    #[error("unknown assessment schema '{0}'")]
    UnknownSchema(String),

    /// Scan/analysis category combination does not select a schema.
    #[error("no assessment schema for scan category '{scan_category}' and analysis '{analysis}'")]
    InvalidSchemaSelection {
        scan_category: String,
        analysis: String,
    },

    /// Integer-typed metric could not be read as a number.
    #[error("field '{field}' expects an integer value, got '{value}'")]
    DataFormat { field: String, value: String },

    /// Required identity field is absent or empty.
    #[error("record is missing required field '{0}'")]
    MissingField(String),

    /// Composite scan label has no identifier segment.
    #[error("scan label '{0}' does not contain a scan identifier")]
    InvalidScanLabel(String),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::DataFormat {
            field: "gm_size".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "field 'gm_size' expects an integer value, got 'abc'"
        );
        assert_eq!(
            ModelError::UnknownSchema("xyz".to_string()).to_string(),
            "unknown assessment schema 'xyz'"
        );
    }
}
