//! CSV reading utilities.

mod header;
mod reader;

pub use header::normalize_header;
pub use reader::{read_records, read_records_from_reader};
