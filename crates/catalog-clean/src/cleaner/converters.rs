//! Single-cell conversion functions for data cleaning.
//!
//! Every function here is total: bad input yields `None` (or
//! [`Cell::Missing`]) and never an error.

use super::sanitizers::sanitize_text;
use crate::config::TextOptions;
use crate::types::{Cell, FieldType};
use crate::utils::{clean_numeric_string, is_missing_token};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Formats tried in order for plain dates.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Formats tried in order for date-times; only the date part is kept.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Earliest and latest representable dates (nanosecond timestamp window).
const MIN_DATE: (i32, u32, u32) = (1677, 9, 22);
const MAX_DATE: (i32, u32, u32) = (2262, 4, 11);

/// Parse a decimal number.
///
/// Strips thousands separators and currency/percent signs. Non-finite
/// values (`nan`, `inf`) are rejected.
pub(crate) fn parse_decimal(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || is_missing_token(trimmed) {
        return None;
    }

    let cleaned = clean_numeric_string(trimmed);
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Parse a whole number: decimal first, then round half to even.
pub(crate) fn parse_integer(value: &str) -> Option<i64> {
    let rounded = parse_decimal(value)?.round_ties_even();
    // i64::MAX is not exactly representable; 2^63 is the first value out of range.
    if (-9.223_372_036_854_776e18..9.223_372_036_854_776e18).contains(&rounded) {
        Some(rounded as i64)
    } else {
        None
    }
}

/// Best-effort date parser.
///
/// Accepts ISO dates and date-times, RFC 3339, common numeric layouts,
/// month-name layouts, `YYYY-MM`, and a bare `YYYY`. Impossible calendar
/// dates and dates outside the representable window give `None`.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() || is_missing_token(trimmed) {
        return None;
    }

    parse_date_unbounded(trimmed).filter(|d| in_representable_range(*d))
}

fn parse_date_unbounded(value: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    parse_partial_date(value)
}

/// `YYYY` or `YYYY-MM`, anchored to the first day of the period.
fn parse_partial_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.splitn(2, '-');
    let year_part = parts.next()?;
    if year_part.len() != 4 || !year_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;

    let month = match parts.next() {
        None => 1,
        Some(m) if (1..=2).contains(&m.len()) && m.chars().all(|c| c.is_ascii_digit()) => {
            m.parse().ok()?
        }
        Some(_) => return None,
    };

    NaiveDate::from_ymd_opt(year, month, 1)
}

fn in_representable_range(date: NaiveDate) -> bool {
    let key = (date.year(), date.month(), date.day());
    key >= MIN_DATE && key <= MAX_DATE
}

/// Convert one raw cell to its declared semantic type.
///
/// URL cells are sanitized like text here; their shape is checked by the
/// row validator, not by coercion.
pub(crate) fn coerce_cell(raw: Option<&str>, field_type: FieldType, options: &TextOptions) -> Cell {
    let Some(raw) = raw else {
        return Cell::Missing;
    };

    let converted = match field_type {
        FieldType::Text => sanitize_text(raw, options).map(Cell::Text),
        FieldType::Url => sanitize_text(raw, options).map(Cell::Url),
        FieldType::Integer => parse_integer(raw).map(Cell::Integer),
        FieldType::Decimal => parse_decimal(raw).map(Cell::Decimal),
        FieldType::Date => parse_date(raw).map(Cell::Date),
    };

    converted.unwrap_or(Cell::Missing)
}
