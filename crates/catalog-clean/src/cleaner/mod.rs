//! Data cleaning steps for canonical datasets.
//!
//! This module provides the four steps run by the pipeline, in order:
//! - Column name normalization
//! - Schema reconciliation (absent fields filled with missing values)
//! - Type coercion per declared field type
//! - Row validation (URL shape and required fields)

mod coercer;
mod converters;
mod normalizer;
mod reconciler;
mod sanitizers;
mod validator;

pub use coercer::TypeCoercer;
pub use normalizer::{normalize_name, normalize_structural, rename_with_table};
pub use validator::{ValidationStats, is_valid_url};

pub(crate) use coercer::{cells_to_series, series_to_cells};
pub(crate) use converters::parse_date;
pub(crate) use normalizer::normalize_columns;
pub(crate) use reconciler::reconcile_schema;
pub(crate) use validator::validate_rows;

use crate::config::TextOptions;
use crate::types::{Cell, FieldType};

/// Convert one raw cell to its declared type; failures give [`Cell::Missing`].
pub fn coerce_value(raw: Option<&str>, field_type: FieldType, options: &TextOptions) -> Cell {
    converters::coerce_cell(raw, field_type, options)
}
