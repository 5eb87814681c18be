//! Value sanitization for assembling test cases
//!
//! Source data carries markers that look like values but mean "no data":
//! formula error codes and placeholder words. [`sanitize`] turns those, and
//! missing values, into empty text so that cases can still be displayed;
//! [`is_valid_value`] is what decides whether a value may enter a case.

use ahash::AHashSet;
use cellwise_core::CoercedValue;
use cellwise_sheet::Record;
use once_cell::sync::Lazy;

/// Strings that stand for "no data"
pub const SENTINEL_VALUES: &[&str] = &[
    "Unknown", "N/A", "NULL", "undefined", "#N/A", "#VALUE!", "#REF!", "#DIV/0!",
];

static SENTINELS: Lazy<AHashSet<String>> = Lazy::new(|| {
    SENTINEL_VALUES
        .iter()
        .map(|s| s.to_ascii_lowercase())
        .collect()
});

/// Check if text is a sentinel marker (trimmed, case-insensitive)
pub fn is_sentinel(text: &str) -> bool {
    SENTINELS.contains(&text.trim().to_ascii_lowercase())
}

/// Normalize a value for use in a test case
///
/// - absent values and sentinel text become empty text;
/// - text is trimmed;
/// - whole numbers use the integer representation, fractions pass through.
pub fn sanitize(value: &CoercedValue) -> CoercedValue {
    match value {
        CoercedValue::Absent => CoercedValue::text(""),
        CoercedValue::Text(s) if is_sentinel(s) => CoercedValue::text(""),
        CoercedValue::Text(s) => CoercedValue::text(s.trim()),
        CoercedValue::Number(n) => CoercedValue::Number(n.clone().normalized()),
        other => other.clone(),
    }
}

/// Check if a value may enter a test case
///
/// Numbers are always valid. Anything else must render to non-empty text
/// that is not a sentinel.
pub fn is_valid_value(value: &CoercedValue) -> bool {
    match value {
        CoercedValue::Absent => false,
        CoercedValue::Number(_) => true,
        CoercedValue::Text(s) => !s.trim().is_empty() && !is_sentinel(s),
        other => !is_sentinel(&other.to_string()),
    }
}

/// Extract sanitized values of `columns` from a record
///
/// All or nothing: `None` when any column is missing or invalid.
pub fn extract_columns<S: AsRef<str>>(record: &Record, columns: &[S]) -> Option<Vec<CoercedValue>> {
    columns
        .iter()
        .map(|column| {
            let value = record
                .get(column.as_ref())
                .map_or_else(|| CoercedValue::text(""), sanitize);
            is_valid_value(&value).then_some(value)
        })
        .collect()
}
