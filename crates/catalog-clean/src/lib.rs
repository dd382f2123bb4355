//! Catalog Cleaning Library
//!
//! Rule-based cleaning of media-catalog CSV exports (anime rankings, movie
//! listings, the Netflix catalog) built with Rust and Polars.
//!
//! # Overview
//!
//! Each supported dataset shape is a [`DatasetKind`] with a fixed canonical
//! schema. Cleaning one table runs four steps:
//!
//! - **Column normalization**: raw headers are mapped onto canonical names
//! - **Schema reconciliation**: absent canonical fields are added as missing
//! - **Type coercion**: every field is converted to its declared type; a value
//!   that does not convert becomes [`Cell::Missing`]
//! - **Row validation**: rows with a malformed URL or a missing required field
//!   are dropped
//!
//! The result holds exactly the canonical columns, in canonical order.
//! [`BatchRunner`] runs the pipeline over many files and writes each output
//! atomically; [`AnalysisReporter`] prints statistics and draws SVG charts.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use catalog_clean::{BatchRunner, CleanerConfig, DatasetJob, Pipeline};
//!
//! let config = CleanerConfig::builder()
//!     .output_dir("cleaned")
//!     .generate_analysis(true)
//!     .build()?;
//!
//! let pipeline = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?;
//!
//! let report = BatchRunner::new(pipeline).run(&[
//!     DatasetJob::new("Top_Anime_data.csv"),
//!     DatasetJob::new("mymoviedb.csv"),
//!     DatasetJob::new("netflix_titles.csv"),
//! ]);
//!
//! for failure in &report.failures {
//!     eprintln!("{}: {}", failure.input.display(), failure.message);
//! }
//! ```
//!
//! # Cleaning a table in memory
//!
//! ```rust,ignore
//! use catalog_clean::{Cell, DatasetKind, Pipeline, io::load_csv};
//!
//! let raw = load_csv(Path::new("mymoviedb.csv"))?;
//! let cleaned = Pipeline::builder().build()?.clean(raw, DatasetKind::Movie, "movies")?;
//!
//! assert!(cleaned.cells("Title")?.iter().all(|c| !c.is_missing()));
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{TypeCoercer, ValidationStats, coerce_value, is_valid_url};
pub use config::{CleanerConfig, CleanerConfigBuilder, ConfigValidationError, TextOptions};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use pipeline::{
    BatchRunner, CleaningStage, ClosureProgressReporter, DatasetJob, Pipeline, PipelineBuilder,
    ProgressReporter, ProgressUpdate,
};
pub use reporting::{AnalysisReporter, DatasetStats, load_and_cast};
pub use schema::{ColumnNaming, DatasetKind, DatasetRules};
pub use types::{
    BatchReport, Cell, CleanedDataset, CleaningSummary, DatasetFailure, FieldSpec, FieldType,
};
