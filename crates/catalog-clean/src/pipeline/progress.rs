//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline reports one update per stage. Callers attach a
//! [`ProgressReporter`] through the builder; the CLI uses a closure that
//! forwards updates to `tracing`.

use serde::{Deserialize, Serialize};

/// Stages of a single dataset run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    Loading,
    Normalizing,
    Reconciling,
    Coercing,
    Validating,
    Writing,
    Analyzing,
    Complete,
    Failed,
}

impl CleaningStage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Normalizing => "Normalizing column names",
            Self::Reconciling => "Reconciling schema",
            Self::Coercing => "Coercing types",
            Self::Validating => "Validating rows",
            Self::Writing => "Writing output",
            Self::Analyzing => "Analyzing",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run this stage accounts for.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.15,
            Self::Normalizing => 0.05,
            Self::Reconciling => 0.05,
            Self::Coercing => 0.35,
            Self::Validating => 0.15,
            Self::Writing => 0.10,
            Self::Analyzing => 0.15,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Overall progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Normalizing => 0.15,
            Self::Reconciling => 0.20,
            Self::Coercing => 0.25,
            Self::Validating => 0.60,
            Self::Writing => 0.75,
            Self::Analyzing => 0.85,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: CleaningStage,

    /// Dataset the update belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: CleaningStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + stage.weight() * stage_progress.clamp(0.0, 1.0);
        Self {
            stage,
            dataset: None,
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn for_dataset(mut self, name: impl Into<String>) -> Self {
        self.dataset = Some(name.into());
        self
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Complete,
            dataset: None,
            progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: CleaningStage::Failed,
            dataset: None,
            progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receiver for pipeline progress updates.
///
/// Implementations must be `Send + Sync` so a pipeline can be moved to a
/// worker thread together with its reporter.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
///
/// # Example
///
/// ```rust,ignore
/// use catalog_clean::Pipeline;
///
/// Pipeline::builder()
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?;
/// ```
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
