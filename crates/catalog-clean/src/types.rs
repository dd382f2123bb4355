use crate::cleaner::{ValidationStats, series_to_cells};
use crate::error::{CleaningError, Result};
use crate::schema::DatasetKind;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Semantic type declared for a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Url,
    Integer,
    Decimal,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a canonical schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
        }
    }
}

/// A single cleaned value.
///
/// `Missing` is the explicit "no data" marker. In the `DataFrame` form of a
/// cleaned table it is stored as a null.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Text(String),
    Url(String),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Text(s) | Self::Url(s) => f.write_str(s),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Before/after accounting for one cleaned dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub name: String,
    pub kind: DatasetKind,
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_dropped: usize,
    /// Written output file, if the dataset was saved to disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl CleaningSummary {
    pub fn new(name: impl Into<String>, kind: DatasetKind, rows_before: usize, rows_after: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            rows_before,
            rows_after,
            rows_dropped: rows_before.saturating_sub(rows_after),
            output: None,
        }
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }
}

/// Output of one pipeline run.
///
/// `data` holds exactly the canonical fields of `kind`, in canonical order,
/// typed per field.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub kind: DatasetKind,
    pub name: String,
    pub data: DataFrame,
    pub summary: CleaningSummary,
    /// Human-readable log of what each step did.
    pub steps: Vec<String>,
    pub validation: ValidationStats,
}

impl CleanedDataset {
    /// Read one canonical column back as cells.
    pub fn cells(&self, column: &str) -> Result<Vec<Cell>> {
        let field = self
            .kind
            .rules()
            .field(column)
            .ok_or_else(|| CleaningError::ColumnNotFound(column.to_string()))?;
        let series = self.data.column(field.name)?.as_materialized_series();
        Ok(series_to_cells(series, field.field_type)?)
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }
}

/// A dataset that could not be processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFailure {
    pub input: PathBuf,
    pub code: String,
    pub message: String,
}

impl DatasetFailure {
    pub fn new(input: PathBuf, error: &CleaningError) -> Self {
        Self {
            input,
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result of running a batch of datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub summaries: Vec<CleaningSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failures: Vec<DatasetFailure>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            summaries: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn total_rows_before(&self) -> usize {
        self.summaries.iter().map(|s| s.rows_before).sum()
    }

    pub fn total_rows_after(&self) -> usize {
        self.summaries.iter().map(|s| s.rows_after).sum()
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}
