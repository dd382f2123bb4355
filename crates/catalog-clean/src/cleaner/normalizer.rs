//! Column name normalization.

use crate::schema::ColumnNaming;
use anyhow::Result;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Trim, lowercase, and keep only `[a-z0-9]`.
pub fn normalize_structural(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Map a name through an explicit rename table.
///
/// An exact match wins; otherwise the trimmed, lowercased name is looked up.
/// Unknown names pass through unchanged.
pub fn rename_with_table(name: &str, table: &[(&str, &str)]) -> String {
    if let Some((_, canonical)) = table.iter().find(|(source, _)| *source == name) {
        return (*canonical).to_string();
    }

    let folded = name.trim().to_lowercase();
    table
        .iter()
        .find(|(source, _)| source.to_lowercase() == folded)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Normalize a single name with the given strategy.
pub fn normalize_name(name: &str, naming: ColumnNaming) -> String {
    match naming {
        ColumnNaming::Structural => normalize_structural(name),
        ColumnNaming::RenameTable(table) => rename_with_table(name, table),
    }
}

/// Rename every column of `df` according to `naming`.
///
/// When several source columns collapse to the same name, the last one wins
/// and takes the position of the first.
pub(crate) fn normalize_columns(df: DataFrame, naming: ColumnNaming) -> Result<DataFrame> {
    let mut order: Vec<String> = Vec::with_capacity(df.width());
    let mut by_name: HashMap<String, Column> = HashMap::with_capacity(df.width());

    for col in df.get_columns() {
        let normalized = normalize_name(col.name().as_str(), naming);
        if by_name.contains_key(&normalized) {
            debug!(
                "Column '{}' collapses onto '{}'; keeping the later column",
                col.name(),
                normalized
            );
        } else {
            order.push(normalized.clone());
        }
        let renamed = col.clone().with_name(normalized.as_str().into());
        by_name.insert(normalized, renamed);
    }

    let columns: Vec<Column> = order
        .iter()
        .filter_map(|name| by_name.remove(name))
        .collect();

    Ok(DataFrame::new(columns)?)
}
