//! Error types for document building and serialization.

use thiserror::Error;

use qap_model::ModelError;

/// Errors raised while building or writing an assessment document.
#[derive(Debug, Error)]
pub enum XmlError {
    /// Schema resolution or record data error.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// I/O error while writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML writing error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A text, attribute or comment value holds a character XML 1.0 forbids.
    #[error("{location} contains U+{code:04X}, which is not allowed in XML")]
    InvalidCharacter { location: String, code: u32 },

    /// Serialized output was not valid UTF-8.
    #[error("serialized document is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type alias for XML operations.
pub type Result<T> = std::result::Result<T, XmlError>;
