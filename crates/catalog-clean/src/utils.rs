//! Shared utilities for the cleaning pipeline.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date or datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Owned copy of the column names of a DataFrame.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Currency and percent signs stripped before numeric parsing.
pub const NUMERIC_AFFIX_CHARS: [char; 4] = ['$', '%', '€', '£'];

/// Digits grouped in threes by `,` or `_`, with an optional fraction.
static GROUPED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?\d{1,3}(?:,\d{3})+(?:\.\d+)?$|^[+-]?\d{1,3}(?:_\d{3})+(?:\.\d+)?$")
        .expect("grouping pattern is a valid regex")
});

/// Strings produced by stringifying a missing value in common tools.
///
/// Matched case-sensitively against the trimmed cell, so a title like
/// "None of the Above" or a name like "Nan" survives.
pub const MISSING_TOKENS: [&str; 9] = [
    "nan", "NaN", "NAN", "None", "null", "NULL", "NaT", "<NA>", "#N/A",
];

/// Clean a string for numeric parsing.
///
/// Leading and trailing currency/percent signs are removed. `,` and `_`
/// are removed only when they group the integer part in threes; any other
/// separator is left in place so the value fails to parse.
///
/// # Example
///
/// ```rust,ignore
/// use catalog_clean::utils::clean_numeric_string;
///
/// assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
/// assert_eq!(clean_numeric_string("  42%  "), "42");
/// assert_eq!(clean_numeric_string("9,1"), "9,1");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    let stripped = s
        .trim()
        .trim_matches(|c| NUMERIC_AFFIX_CHARS.contains(&c))
        .trim();

    if GROUPED_NUMBER.is_match(stripped) {
        stripped.chars().filter(|c| *c != ',' && *c != '_').collect()
    } else {
        stripped.to_string()
    }
}

/// Check if a trimmed cell is a stringified missing value.
pub fn is_missing_token(s: &str) -> bool {
    let trimmed = s.trim();
    MISSING_TOKENS.contains(&trimmed)
}
