//! Custom error types for the cleaning pipeline.
//!
//! Errors here are fatal to one dataset at most. Cell-level coercion failures
//! never surface as errors; they become [`Cell::Missing`](crate::types::Cell::Missing).
//!
//! Errors are serializable so the batch report can carry them as
//! `{code, message}` pairs.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input file exists but could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file could not be parsed as a CSV table.
    #[error("Failed to parse '{}' as CSV: {reason}", path.display())]
    UnparsableCsv { path: PathBuf, reason: String },

    /// No dataset kind was given and none could be derived from the file name.
    #[error("Cannot determine dataset kind for '{}'; pass --kind", .0.display())]
    UnknownDatasetKind(PathBuf),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Two datasets in one batch would write the same output file.
    #[error("Output path '{}' is already used by another dataset in this batch", .0.display())]
    OutputCollision(PathBuf),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A cleaning step failed for a reason other than the ones above.
    #[error("Cleaning failed: {0}")]
    CleaningFailed(String),

    /// Chart rendering failed.
    #[error("Failed to render chart: {0}")]
    ChartFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code used in the JSON batch report.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::Unreadable { .. } => "UNREADABLE",
            Self::UnparsableCsv { .. } => "UNPARSABLE_CSV",
            Self::UnknownDatasetKind(_) => "UNKNOWN_DATASET_KIND",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::OutputCollision(_) => "OUTPUT_COLLISION",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::CleaningFailed(_) => "CLEANING_FAILED",
            Self::ChartFailed(_) => "CHART_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether this error only affects the dataset it came from.
    ///
    /// Configuration errors are the only kind that should stop a whole batch;
    /// everything else is reported and the batch moves on.
    pub fn is_dataset_fatal(&self) -> bool {
        match self {
            Self::InvalidConfig(_) => false,
            Self::WithContext { source, .. } => source.is_dataset_fatal(),
            _ => true,
        }
    }
}

impl From<crate::config::ConfigValidationError> for CleaningError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(err.to_string())
    }
}

impl From<anyhow::Error> for CleaningError {
    /// Recover a typed error from an `anyhow` chain, falling back to
    /// [`CleaningError::CleaningFailed`].
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<CleaningError>() {
            Ok(e) => return e,
            Err(e) => e,
        };
        match err.downcast::<polars::error::PolarsError>() {
            Ok(e) => CleaningError::Polars(e),
            Err(e) => CleaningError::CleaningFailed(format!("{e:#}")),
        }
    }
}

impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
