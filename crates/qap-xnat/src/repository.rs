//! Seams between the ingest pipeline and the repository.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use qap_model::{ScanKey, SchemaId};

use crate::error::{Result, XnatError};

/// Where one assessment document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentTarget {
    pub project: String,
    pub key: ScanKey,
    /// Assessment label, unique within the session.
    pub label: String,
    pub schema: SchemaId,
}

impl AssessmentTarget {
    /// Builds the target for a scan, deriving the label from the key and schema.
    pub fn new(project: impl Into<String>, key: ScanKey, schema: SchemaId) -> Self {
        let label = key.assessment_label(schema);
        Self {
            project: project.into(),
            key,
            label,
            schema,
        }
    }
}

/// Looks up the type label of an existing scan.
pub trait ScanTypeResolver {
    fn scan_type(&self, project: &str, key: &ScanKey) -> Result<String>;
}

/// Stores serialized assessment documents.
pub trait DocumentSink {
    /// Stores `xml` under `target` and returns the identifier it was given.
    ///
    /// Fails with [`XnatError::AlreadyExists`] when the label is taken; the
    /// existing assessment is left untouched.
    fn submit(&self, target: &AssessmentTarget, xml: &str) -> Result<String>;
}

/// Resolver that answers every lookup with the same scan type.
#[derive(Debug, Clone)]
pub struct FixedScanType(pub String);

impl ScanTypeResolver for FixedScanType {
    fn scan_type(&self, _project: &str, _key: &ScanKey) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Sink that writes `<label>.xml` files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the document for `label` is written to.
    pub fn path_for(&self, label: &str) -> PathBuf {
        self.root.join(format!("{label}.xml"))
    }
}

impl DocumentSink for DirectorySink {
    /// Writes to a temporary file in the output directory and moves it into
    /// place without replacing an existing document. A failed write leaves
    /// nothing behind under `<label>.xml`.
    fn submit(&self, target: &AssessmentTarget, xml: &str) -> Result<String> {
        let path = self.path_for(&target.label);
        let io_error = |source| XnatError::Io {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.root).map_err(|source| XnatError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut staged = NamedTempFile::new_in(&self.root).map_err(io_error)?;
        staged.write_all(xml.as_bytes()).map_err(io_error)?;
        staged.flush().map_err(io_error)?;
        match staged.persist_noclobber(&path) {
            Ok(_) => {}
            Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
                return Err(XnatError::AlreadyExists {
                    label: target.label.clone(),
                });
            }
            Err(err) => return Err(io_error(err.error)),
        }

        debug!(path = %path.display(), label = %target.label, "wrote assessment document");
        Ok(path.display().to_string())
    }
}
