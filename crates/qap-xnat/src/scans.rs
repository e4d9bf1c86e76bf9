//! Scan listing responses.

use serde::Deserialize;

use crate::error::{Result, XnatError};

/// One entry of a session's scan listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanEntry {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub scan_type: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScanListing {
    Wrapped {
        #[serde(rename = "ResultSet")]
        result_set: ResultSet,
    },
    Bare(Vec<ScanEntry>),
}

#[derive(Deserialize)]
struct ResultSet {
    #[serde(rename = "Result", default)]
    result: Vec<ScanEntry>,
}

/// Parses a `?format=json` scan listing.
///
/// Accepts the `{"ResultSet": {"Result": [...]}}` envelope and a bare array.
pub fn parse_scan_listing(body: &str) -> Result<Vec<ScanEntry>> {
    let listing: ScanListing = serde_json::from_str(body)?;
    Ok(match listing {
        ScanListing::Wrapped { result_set } => result_set.result,
        ScanListing::Bare(entries) => entries,
    })
}

/// Returns the type of the single entry whose ID is `scan_id`.
pub fn select_scan_type(entries: &[ScanEntry], session: &str, scan_id: &str) -> Result<String> {
    let mut matches = entries.iter().filter(|entry| entry.id == scan_id);
    match (matches.next(), matches.count()) {
        (Some(entry), 0) => Ok(entry.scan_type.clone()),
        (None, _) => Err(XnatError::ScanNotFound {
            session: session.to_string(),
            scan_id: scan_id.to_string(),
        }),
        (Some(_), rest) => Err(XnatError::AmbiguousScan {
            session: session.to_string(),
            scan_id: scan_id.to_string(),
            count: rest + 1,
        }),
    }
}
