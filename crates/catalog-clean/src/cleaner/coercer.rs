//! Column-level type coercion for canonical fields.

use super::converters::coerce_cell;
use crate::config::TextOptions;
use crate::error::CleaningError;
use crate::types::{Cell, FieldSpec, FieldType};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::debug;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Type coercer converting canonical columns to their declared types.
pub struct TypeCoercer;

impl TypeCoercer {
    /// Coerce every field in `fields`, one pass per field.
    ///
    /// Each column is read as strings and rebuilt as a typed Series. Cells
    /// that fail to convert become nulls; the column itself never fails.
    /// Returns the frame and a human-readable step per field.
    pub fn coerce(
        &self,
        mut df: DataFrame,
        fields: &[FieldSpec],
        options: &TextOptions,
    ) -> Result<(DataFrame, Vec<String>)> {
        let mut steps = Vec::with_capacity(fields.len());

        for field in fields {
            let column = df
                .column(field.name)
                .map_err(|_| CleaningError::ColumnNotFound(field.name.to_string()))?;
            let raw = column.as_materialized_series().cast(&DataType::String)?;
            let nulls_before = raw.null_count();

            let cells: Vec<Cell> = raw
                .str()?
                .into_iter()
                .map(|value| coerce_cell(value, field.field_type, options))
                .collect();

            let typed = cells_to_series(field.name, field.field_type, &cells)?;
            let lost = typed.null_count().saturating_sub(nulls_before);
            df.replace(field.name, typed)?;

            let step = if lost > 0 {
                format!(
                    "Coerced '{}' to {} ({} values became missing)",
                    field.name, field.field_type, lost
                )
            } else {
                format!("Coerced '{}' to {}", field.name, field.field_type)
            };
            debug!("  {}", step);
            steps.push(step);
        }

        Ok((df, steps))
    }
}

/// Build a typed Series from cells. `Cell::Missing` becomes null.
///
/// A cell whose variant does not match `field_type` is treated as missing.
pub(crate) fn cells_to_series(name: &str, field_type: FieldType, cells: &[Cell]) -> Result<Series> {
    let series = match field_type {
        FieldType::Text | FieldType::Url => {
            let values: Vec<Option<&str>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Text(s) | Cell::Url(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        FieldType::Integer => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Integer(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        FieldType::Decimal => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Decimal(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        FieldType::Date => {
            let days: Vec<Option<i32>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Date(d) => Some(d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), days).cast(&DataType::Date)?
        }
    };

    Ok(series)
}

/// Read a typed Series back as cells. Nulls become `Cell::Missing`.
pub(crate) fn series_to_cells(series: &Series, field_type: FieldType) -> Result<Vec<Cell>> {
    let cells = match field_type {
        FieldType::Text => series
            .str()?
            .into_iter()
            .map(|v| v.map_or(Cell::Missing, |s| Cell::Text(s.to_string())))
            .collect(),
        FieldType::Url => series
            .str()?
            .into_iter()
            .map(|v| v.map_or(Cell::Missing, |s| Cell::Url(s.to_string())))
            .collect(),
        FieldType::Integer => series
            .i64()?
            .into_iter()
            .map(|v| v.map_or(Cell::Missing, Cell::Integer))
            .collect(),
        FieldType::Decimal => series
            .f64()?
            .into_iter()
            .map(|v| v.map_or(Cell::Missing, Cell::Decimal))
            .collect(),
        FieldType::Date => {
            let days = series.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .map(|v| {
                    v.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE))
                        .map_or(Cell::Missing, Cell::Date)
                })
                .collect()
        }
    };

    Ok(cells)
}
