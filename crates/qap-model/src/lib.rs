//! Data model for QAP quality-assessment ingestion.
//!
//! - [`Record`]: one results row keyed by column name
//! - [`SchemaId`] / [`SchemaDefinition`]: the assessment datatypes and the
//!   static tables that place each metric in the output document
//! - [`ScanKey`]: repository coordinates derived from a row

pub mod error;
pub mod ids;
pub mod record;
pub mod schema;

pub use error::{ModelError, Result};
pub use ids::{ScanKey, normalize_label, scan_id_from_label};
pub use record::{REQUIRED_FIELDS, Record, SCAN_FIELD, SESSION_FIELD, SUBJECT_FIELD};
pub use schema::{
    Placement, QapAnalysis, ScanCategory, SchemaDefinition, SchemaId, XNAT_NS, XNAT_NS_PREFIX,
    XSI_NS, XSI_NS_PREFIX,
};
