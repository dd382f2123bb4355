//! Reporting module.
//!
//! - [`AnalysisReporter`]: descriptive statistics and SVG charts for a
//!   cleaned table, plus charts comparing every table in a batch
//! - [`render_summary`] / [`write_report`]: the console summary table and
//!   the JSON batch report (`--json`, `--emit-report`)
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_clean::reporting::{AnalysisReporter, load_and_cast};
//!
//! let reporter = AnalysisReporter::new("plots");
//! let df = load_and_cast(Path::new("anime_clean.csv"))?;
//! let stats = reporter.analyze(&df, "anime_clean")?;
//! reporter.compare(&[stats])?;
//! ```

mod analysis;
mod charts;
mod summary;

pub use analysis::{
    AnalysisReporter, ColumnStats, DatasetStats, NumericSummary, is_date_column, load_and_cast,
};
pub use charts::HISTOGRAM_BINS;
pub use summary::{REPORT_FILE_NAME, render_summary, write_report};
