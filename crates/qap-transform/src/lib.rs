//! QAP results transformation utilities.
//!
//! - **normalization**: type corrections applied to each results row before
//!   it is turned into an assessment document

pub mod normalization;

pub use normalization::numeric::{parse_f64, truncate_to_integer};
pub use normalization::{INTEGER_FIELDS, normalize_record, normalize_records};
