//! Schema reconciliation: make sure every canonical field exists.

use crate::types::FieldSpec;
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// Append an all-missing String column for every expected field that is absent.
///
/// Extra columns are left in place. Returns the frame and the names of the
/// fields that had to be added.
pub(crate) fn reconcile_schema(
    mut df: DataFrame,
    fields: &[FieldSpec],
) -> Result<(DataFrame, Vec<String>)> {
    let height = df.height();
    let mut added = Vec::new();

    for field in fields {
        if df.column(field.name).is_ok() {
            continue;
        }
        let filler = Series::full_null(field.name.into(), height, &DataType::String);
        df.with_column(filler)?;
        added.push(field.name.to_string());
    }

    if !added.is_empty() {
        debug!("Added {} missing canonical columns: {:?}", added.len(), added);
    }

    Ok((df, added))
}
