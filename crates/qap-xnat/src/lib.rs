//! Repository access for QAP assessments.
//!
//! - [`XnatClient`]: looks up scan types and uploads assessment documents
//!   over the XNAT REST API
//! - [`FixedScanType`] / [`DirectorySink`]: offline stand-ins that need no
//!   server
//!
//! The pipeline only sees the [`ScanTypeResolver`] and [`DocumentSink`]
//! traits.

mod client;
mod error;
mod repository;
mod scans;

pub use client::{Credentials, XnatClient};
pub use error::{Result, XnatError};
pub use repository::{AssessmentTarget, DirectorySink, DocumentSink, FixedScanType, ScanTypeResolver};
pub use scans::{ScanEntry, parse_scan_listing, select_scan_type};
