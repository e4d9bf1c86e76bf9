//! Results table reading.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use qap_model::{REQUIRED_FIELDS, Record};

use crate::error::{IngestError, Result};

use super::header::{normalize_cell, normalize_header};

/// Reads a QAP results CSV into one [`Record`] per data row.
///
/// The first non-blank row is the header. Columns with an empty header
/// (e.g. a pandas index column) are dropped, blank rows are skipped, short
/// rows are padded with empty values, and surplus cells are ignored. The
/// header must name `subject`, `session` and `scan`; an empty file yields no
/// records.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(IngestError::csv(path))?;
    collect_records(reader, path)
}

/// Same as [`read_records`] for an in-memory or streamed source.
///
/// `origin` is only used in error messages.
pub fn read_records_from_reader<R: Read>(source: R, origin: &Path) -> Result<Vec<Record>> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    collect_records(reader, origin)
}

fn collect_records<R: Read>(mut reader: csv::Reader<R>, path: &Path) -> Result<Vec<Record>> {
    let mut headers: Option<Vec<String>> = None;
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row.map_err(IngestError::csv(path))?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let Some(columns) = headers.as_ref() else {
            let columns: Vec<String> = row.iter().map(normalize_header).collect();
            check_required_columns(&columns, path)?;
            headers = Some(columns);
            continue;
        };
        let mut record = Record::new();
        for (idx, column) in columns.iter().enumerate() {
            if column.is_empty() {
                continue;
            }
            let value = row.get(idx).map(normalize_cell).unwrap_or_default();
            record.insert(column.as_str(), value);
        }
        records.push(record);
    }

    debug!(
        path = %path.display(),
        records = records.len(),
        columns = headers.as_ref().map_or(0, Vec::len),
        "loaded results table"
    );
    Ok(records)
}

fn check_required_columns(columns: &[String], path: &Path) -> Result<()> {
    for required in REQUIRED_FIELDS {
        if !columns.iter().any(|column| column == required) {
            return Err(IngestError::MissingColumn {
                column: required.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}
