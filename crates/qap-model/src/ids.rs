#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;
use crate::record::{Record, SCAN_FIELD, SESSION_FIELD, SUBJECT_FIELD};
use crate::schema::SchemaId;

/// Repository coordinates of one scan, derived from a results row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ScanKey {
    pub subject: String,
    pub session: String,
    /// Scan identifier within the session (`3` for a `scan_3` label).
    pub scan_id: String,
}

impl ScanKey {
    pub fn new(
        subject: impl Into<String>,
        session: impl Into<String>,
        scan_id: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            session: session.into(),
            scan_id: scan_id.into(),
        }
    }

    /// Reads the identity columns of a record.
    pub fn from_record(record: &Record) -> Result<Self, ModelError> {
        let subject = required_field(record, SUBJECT_FIELD)?;
        let session = required_field(record, SESSION_FIELD)?;
        let scan = required_field(record, SCAN_FIELD)?;
        let scan_id = scan_id_from_label(scan)?;
        Ok(Self::new(subject, session, scan_id))
    }

    /// Label of the assessment this scan's results are stored under.
    pub fn assessment_label(&self, schema: SchemaId) -> String {
        normalize_label(&format!(
            "{}_{}_s{}_{}",
            self.subject,
            self.session,
            self.scan_id,
            schema.element_name()
        ))
    }
}

impl fmt::Display for ScanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.subject, self.session, self.scan_id)
    }
}

fn required_field<'a>(record: &'a Record, field: &str) -> Result<&'a str, ModelError> {
    record
        .get(field)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ModelError::MissingField(field.to_string()))
}

/// Extracts the scan identifier from a composite label such as `scan_3`.
///
/// The identifier is the segment between the first and second underscore.
pub fn scan_id_from_label(label: &str) -> Result<String, ModelError> {
    label
        .split('_')
        .nth(1)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ModelError::InvalidScanLabel(label.to_string()))
}

/// Replaces characters the repository rejects in labels with underscores.
pub fn normalize_label(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '/' | ',' | '.' | '^' | ' ' => '_',
            other => other,
        })
        .collect()
}
