//! Numeric normalization utilities.

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

/// Renders a decimal string as the integer it truncates to.
///
/// `"12.0"` becomes `"12"` and `"-3.7"` becomes `"-3"`. Returns None when the
/// value is not a finite number or does not fit in an `i64`.
pub fn truncate_to_integer(value: &str) -> Option<String> {
    let parsed = parse_f64(value)?;
    if !parsed.is_finite() {
        return None;
    }
    let truncated = parsed.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some((truncated as i64).to_string())
}
