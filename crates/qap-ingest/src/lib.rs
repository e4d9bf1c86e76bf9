//! QAP results ingestion.
//!
//! Loads the CSV tables written by QAP (one row per scan) into
//! [`qap_model::Record`] values keyed by header name.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use qap_ingest::read_records;
//!
//! let records = read_records(Path::new("qap_anatomical_spatial.csv"))?;
//! ```

mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{normalize_header, read_records, read_records_from_reader};
