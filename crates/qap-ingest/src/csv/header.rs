//! CSV header normalization.

/// Normalizes a header cell: strips a byte-order mark and surrounding whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Normalizes a data cell.
pub(crate) fn normalize_cell(raw: &str) -> String {
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  snr  "), "snr");
        assert_eq!(normalize_header("\u{feff}subject"), "subject");
        assert_eq!(normalize_header("snr"), "snr");
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(normalize_cell(" 10.5 "), "10.5");
        assert_eq!(normalize_cell(""), "");
    }
}
