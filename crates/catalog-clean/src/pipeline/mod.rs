//! Pipeline module.
//!
//! [`Pipeline`] cleans one table; [`BatchRunner`] drives it over many files
//! and writes the outputs.

pub mod batch;
mod builder;
pub mod progress;

pub use batch::{BatchRunner, DatasetJob, resolve_output_path};
pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate};
