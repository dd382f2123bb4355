//! Batch runner: load, clean, and write a list of datasets.
//!
//! Each dataset runs on its own. A fatal error in one job is recorded in
//! the [`BatchReport`] and the batch moves on to the next job.

use crate::config::CleanerConfig;
use crate::error::{CleaningError, Result};
use crate::io::{load_csv, write_csv_atomic};
use crate::pipeline::Pipeline;
use crate::pipeline::progress::{CleaningStage, ProgressUpdate};
use crate::reporting::{AnalysisReporter, DatasetStats};
use crate::schema::DatasetKind;
use crate::types::{BatchReport, CleanedDataset, DatasetFailure};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{error, info, warn};

/// One input file and, optionally, its dataset kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetJob {
    pub path: PathBuf,
    /// When `None`, the kind is taken from the file name.
    pub kind: Option<DatasetKind>,
}

impl DatasetJob {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: DatasetKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Explicit kind, else the file-name convention.
    pub fn resolve_kind(&self) -> Result<DatasetKind> {
        self.kind
            .or_else(|| DatasetKind::from_file_name(&self.path))
            .ok_or_else(|| CleaningError::UnknownDatasetKind(self.path.clone()))
    }

    /// Dataset name used in summaries and chart file names.
    pub fn name(&self) -> String {
        file_stem(&self.path)
    }
}

/// Runs a [`Pipeline`] over many files, one at a time.
pub struct BatchRunner {
    pipeline: Pipeline,
    analysis: Option<AnalysisReporter>,
}

static_assertions::assert_impl_all!(BatchRunner: Send, Sync);

impl BatchRunner {
    /// Analysis is enabled when the pipeline config asks for it.
    pub fn new(pipeline: Pipeline) -> Self {
        let config = pipeline.config();
        let analysis = config
            .generate_analysis
            .then(|| AnalysisReporter::new(config.plots_dir.clone()));
        Self { pipeline, analysis }
    }

    /// Whether the analysis reporter prints statistics to stdout.
    pub fn with_console(mut self, echo: bool) -> Self {
        self.analysis = self.analysis.map(|a| a.with_console(echo));
        self
    }

    /// Clean every job in order and collect the outcome.
    pub fn run(&self, jobs: &[DatasetJob]) -> BatchReport {
        let mut report = BatchReport::new();
        let mut used_outputs: HashSet<PathBuf> = HashSet::new();
        let inputs: HashSet<PathBuf> = jobs.iter().map(|job| path_key(&job.path)).collect();
        let mut analyzed: Vec<DatasetStats> = Vec::new();

        info!("Cleaning {} dataset(s)", jobs.len());

        for job in jobs {
            let cleaned = match self.run_job(job, &inputs, &mut used_outputs) {
                Ok(cleaned) => cleaned,
                Err(e) => {
                    if e.is_dataset_fatal() {
                        error!("Skipping '{}': {}", job.path.display(), e);
                    } else {
                        warn!("'{}': {}", job.path.display(), e);
                    }
                    report.failures.push(DatasetFailure::new(job.path.clone(), &e));
                    continue;
                }
            };

            if let Some(reporter) = &self.analysis {
                self.pipeline.report_progress(
                    ProgressUpdate::new(CleaningStage::Analyzing, 0.0, "Analyzing cleaned table")
                        .for_dataset(&cleaned.name),
                );
                match reporter.analyze(&cleaned.data, &cleaned.name) {
                    Ok(stats) => analyzed.push(stats),
                    Err(e) => {
                        error!("Analysis of '{}' failed: {}", cleaned.name, e);
                        report.failures.push(DatasetFailure::new(job.path.clone(), &e));
                    }
                }
            }

            self.pipeline.report_progress(
                ProgressUpdate::complete(format!(
                    "Cleaned {} rows ({} dropped)",
                    cleaned.summary.rows_after, cleaned.summary.rows_dropped
                ))
                .for_dataset(&cleaned.name),
            );
            report.summaries.push(cleaned.summary);
        }

        if let Some(reporter) = &self.analysis
            && !analyzed.is_empty()
            && let Err(e) = reporter.compare(&analyzed)
        {
            error!("Comparison charts failed: {}", e);
        }

        info!(
            "Batch finished: {} cleaned, {} failed",
            report.summaries.len(),
            report.failures.len()
        );
        report
    }

    /// `inputs` and `used_outputs` hold [`path_key`] forms, so two spellings
    /// of one file compare equal.
    fn run_job(
        &self,
        job: &DatasetJob,
        inputs: &HashSet<PathBuf>,
        used_outputs: &mut HashSet<PathBuf>,
    ) -> Result<CleanedDataset> {
        let config = self.pipeline.config();
        let kind = job.resolve_kind()?;
        let name = job.name();

        let output = if config.save_to_disk {
            let path = resolve_output_path(config, &job.path);
            let key = path_key(&path);
            // An output may never replace a raw input of this batch, run or not.
            if used_outputs.contains(&key) || inputs.contains(&key) {
                return Err(CleaningError::OutputCollision(path));
            }
            Some((path, key))
        } else {
            None
        };

        self.pipeline.report_progress(
            ProgressUpdate::new(
                CleaningStage::Loading,
                0.0,
                format!("Loading {}", job.path.display()),
            )
            .for_dataset(&name),
        );
        let raw = load_csv(&job.path)?;

        let mut cleaned = self.pipeline.clean(raw, kind, &name)?;

        if let Some((path, key)) = output {
            self.pipeline.report_progress(
                ProgressUpdate::new(
                    CleaningStage::Writing,
                    0.0,
                    format!("Writing {}", path.display()),
                )
                .for_dataset(&name),
            );
            write_csv_atomic(&mut cleaned.data, &path)?;
            info!("Dataset saved: {}", path.display());
            used_outputs.insert(key);
            cleaned.summary = cleaned.summary.with_output(path);
        }

        Ok(cleaned)
    }
}

/// `<output_dir or input dir>/<stem><suffix>.csv`, or `<output_name>.csv`
/// when an output name is configured.
pub fn resolve_output_path(config: &CleanerConfig, input: &Path) -> PathBuf {
    let dir = match &config.output_dir {
        Some(dir) => dir.clone(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    let file_name = match &config.output_name {
        Some(name) => format!("{name}.csv"),
        None => format!("{}{}.csv", file_stem(input), config.output_suffix),
    };

    dir.join(file_name)
}

/// Absolute form of `path` with `.` and `..` folded and symlinks in the
/// existing part of the path resolved. The file itself need not exist.
fn path_key(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }

    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    let resolved = match (normalized.parent(), normalized.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent).ok().map(|dir| dir.join(name)),
        _ => None,
    };
    resolved.unwrap_or(normalized)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string())
}
