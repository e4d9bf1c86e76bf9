//! Type corrections for QAP results rows.
//!
//! QAP writes some count metrics as decimals (`"1234.0"`), which the
//! assessment datatypes reject for their integer-typed fields. Those fields
//! are rewritten to the integer they truncate to; every other field passes
//! through untouched.

pub mod numeric;

use qap_model::{ModelError, Record, Result};
use tracing::debug;

use self::numeric::truncate_to_integer;

/// Metrics the assessment datatypes declare as integers.
pub const INTEGER_FIELDS: [&str; 6] = [
    "num_fd", "fg_size", "bg_size", "gm_size", "wm_size", "csf_size",
];

/// Returns a copy of `record` with integer-typed fields in canonical form.
///
/// Absent or empty integer fields are left as they are. A present value that
/// is not numeric fails with [`ModelError::DataFormat`].
pub fn normalize_record(record: &Record) -> Result<Record> {
    let mut normalized = record.clone();
    for field in INTEGER_FIELDS {
        let Some(value) = record.get(field) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        let integer = truncate_to_integer(value).ok_or_else(|| ModelError::DataFormat {
            field: field.to_string(),
            value: value.to_string(),
        })?;
        if integer != value {
            debug!(field, "coerced decimal value to integer");
        }
        normalized.insert(field, integer);
    }
    Ok(normalized)
}

/// Normalizes each record independently, keeping input order.
///
/// A failure on one record does not affect the others.
pub fn normalize_records(records: &[Record]) -> Vec<Result<Record>> {
    records.iter().map(normalize_record).collect()
}
