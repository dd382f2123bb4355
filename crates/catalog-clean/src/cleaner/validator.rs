//! Row validation: drop rows that fail a URL-shape check or miss a required field.

use crate::error::CleaningError;
use crate::types::{FieldSpec, FieldType};
use anyhow::Result;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("URL pattern is a valid regex"));

/// Whether a value has the `http(s)://...` shape.
pub fn is_valid_url(value: &str) -> bool {
    URL_PATTERN.is_match(value)
}

/// Row-level drop accounting for one validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    /// Rows with at least one malformed URL.
    pub invalid_url_rows: usize,
    /// Rows with at least one missing required field.
    pub missing_required_rows: usize,
    /// Rows removed in total; a row failing both checks counts once.
    pub dropped_rows: usize,
}

/// Keep only rows that pass every check; row order is preserved.
///
/// URL fields are checked only where a value is present; a missing URL is
/// the required-field check's concern.
pub(crate) fn validate_rows(df: DataFrame, fields: &[FieldSpec]) -> Result<(DataFrame, ValidationStats)> {
    let height = df.height();
    let mut url_ok = vec![true; height];
    let mut present = vec![true; height];

    for field in fields {
        let series = df
            .column(field.name)
            .map_err(|_| CleaningError::ColumnNotFound(field.name.to_string()))?
            .as_materialized_series();

        if field.field_type == FieldType::Url {
            for (idx, value) in series.str()?.into_iter().enumerate() {
                if let Some(url) = value
                    && !is_valid_url(url)
                {
                    url_ok[idx] = false;
                }
            }
        }

        if field.required {
            for (idx, is_null) in series.is_null().into_iter().enumerate() {
                if is_null.unwrap_or(false) {
                    present[idx] = false;
                }
            }
        }
    }

    let mut stats = ValidationStats::default();
    let keep: Vec<bool> = url_ok
        .iter()
        .zip(&present)
        .map(|(&url, &req)| {
            if !url {
                stats.invalid_url_rows += 1;
            }
            if !req {
                stats.missing_required_rows += 1;
            }
            url && req
        })
        .collect();
    stats.dropped_rows = keep.iter().filter(|k| !**k).count();

    if stats.dropped_rows > 0 {
        debug!(
            "Dropping {} rows ({} malformed URL, {} missing required field)",
            stats.dropped_rows, stats.invalid_url_rows, stats.missing_required_rows
        );
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok((df.filter(&mask)?, stats))
}
