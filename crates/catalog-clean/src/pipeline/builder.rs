//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! running one raw table through the cleaning steps of its dataset kind.

use crate::cleaner::{TypeCoercer, normalize_columns, reconcile_schema, validate_rows};
use crate::config::CleanerConfig;
use crate::error::{CleaningError, Result};
use crate::pipeline::progress::{
    ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate,
};
use crate::schema::DatasetKind;
use crate::types::{CleanedDataset, CleaningSummary};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use catalog_clean::{CleanerConfig, DatasetKind, Pipeline};
///
/// let cleaned = Pipeline::builder()
///     .config(CleanerConfig::builder().strip_non_ascii(true).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .clean(raw, DatasetKind::Anime, "anime")?;
/// ```
pub struct Pipeline {
    config: CleanerConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    coercer: TypeCoercer,
}

// A pipeline can be handed to a worker thread, one dataset per worker.
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Clean a raw table with the rules of `kind`.
    ///
    /// Runs normalize, reconcile, coerce, validate, then projects the result
    /// onto the canonical fields in canonical order. Cell-level failures
    /// never fail the run; they become missing values and may cause the row
    /// to be dropped.
    ///
    /// Progress is reported up to [`CleaningStage::Validating`]; the
    /// terminal [`CleaningStage::Complete`] update is sent by the caller
    /// once the table has been written.
    pub fn clean(&self, df: DataFrame, kind: DatasetKind, name: &str) -> Result<CleanedDataset> {
        self.clean_internal(df, kind, name).inspect_err(|e| {
            self.report_progress(ProgressUpdate::failed(e.to_string()).for_dataset(name));
            error!("Cleaning '{}' failed: {}", name, e);
        })
    }

    /// Report progress if a reporter is configured.
    pub(crate) fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn stage(&self, stage: CleaningStage, name: &str) {
        self.report_progress(
            ProgressUpdate::new(stage, 0.0, format!("{}...", stage.display_name())).for_dataset(name),
        );
    }

    fn clean_internal(&self, df: DataFrame, kind: DatasetKind, name: &str) -> Result<CleanedDataset> {
        let start_time = Instant::now();
        let rules = kind.rules();
        let fields = rules.fields();
        let rows_before = df.height();
        let mut steps: Vec<String> = Vec::new();

        info!(
            "Cleaning '{}' as {} ({} rows, {} columns)",
            name,
            rules.display_name(),
            rows_before,
            df.width()
        );

        // Step 1: column names
        self.stage(CleaningStage::Normalizing, name);
        let df = normalize_columns(df, rules.column_naming())?;
        debug!("Normalized columns: {:?}", df.get_column_names());

        // Step 2: absent canonical fields
        self.stage(CleaningStage::Reconciling, name);
        let (df, added) = reconcile_schema(df, fields)?;
        if !added.is_empty() {
            steps.push(format!("Added missing columns: {}", added.join(", ")));
        }

        // Step 3: typed columns
        self.stage(CleaningStage::Coercing, name);
        let (df, coercion_steps) = self.coercer.coerce(df, fields, &self.config.text)?;
        steps.extend(coercion_steps);

        // Step 4: row checks
        self.stage(CleaningStage::Validating, name);
        let (df, validation) = validate_rows(df, fields)?;
        if validation.dropped_rows > 0 {
            steps.push(format!(
                "Dropped {} rows ({} with malformed URLs, {} missing required fields)",
                validation.dropped_rows, validation.invalid_url_rows, validation.missing_required_rows
            ));
        }

        // Step 5: canonical projection
        let data = df
            .select(fields.iter().map(|f| f.name))
            .map_err(|e| CleaningError::Polars(e).with_context("Projecting canonical columns"))?;

        let summary = CleaningSummary::new(name, kind, rows_before, data.height());
        info!(
            "'{}': {} -> {} rows in {:.2?}",
            name,
            summary.rows_before,
            summary.rows_after,
            start_time.elapsed()
        );

        Ok(CleanedDataset {
            kind,
            name: name.to_string(),
            data,
            summary,
            steps,
            validation,
        })
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleanerConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleanerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, crate::config::ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            coercer: TypeCoercer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;
    use crate::utils::column_names;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn anime_raw() -> DataFrame {
        df!(
            "Rank" => &["1", "7.0", "3"],
            "Title" => &["Fullmetal Alchemist", "Steins;Gate", "Akira"],
            "Type" => &["TV", "TV", "Movie"],
            "Episodes" => &["64", "24", "1"],
            "Score" => &["9.1", "9.07", "8.1"],
            "Members" => &["3,744,541", "2,500,000", "1000"],
            "Aired" => &["Apr 2009", "Apr 2011", "1988"],
            "Anime URL" => &["https://a.test/1", "https://a.test/2", "https://a.test/3"],
            "Image URL" => &["https://i.test/1.jpg", "https://i.test/2.jpg", "not-a-url"],
            "Studio" => &["Bones", "White Fox", "TMS"]
        )
        .unwrap()
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert_eq!(pipeline.config().output_suffix, "_clean");
        assert!(pipeline.progress_reporter.is_none());
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let mut config = CleanerConfig::default();
        config.output_suffix = String::new();
        assert!(Pipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_clean_projects_canonical_columns() {
        let pipeline = Pipeline::builder().build().unwrap();
        let cleaned = pipeline.clean(anime_raw(), DatasetKind::Anime, "anime").unwrap();

        assert_eq!(
            column_names(&cleaned.data),
            vec![
                "rank", "title", "type", "episodes", "score", "members", "aired", "animeurl",
                "imageurl"
            ]
        );
        assert_eq!(cleaned.summary.rows_before, 3);
        assert_eq!(cleaned.summary.rows_after, 2);
        assert_eq!(cleaned.summary.rows_dropped, 1);
        assert_eq!(cleaned.validation.invalid_url_rows, 1);
    }

    #[test]
    fn test_clean_coerces_values() {
        let pipeline = Pipeline::builder().build().unwrap();
        let cleaned = pipeline.clean(anime_raw(), DatasetKind::Anime, "anime").unwrap();

        assert_eq!(
            cleaned.cells("rank").unwrap(),
            vec![Cell::Integer(1), Cell::Integer(7)]
        );
        assert_eq!(
            cleaned.cells("members").unwrap(),
            vec![Cell::Integer(3_744_541), Cell::Integer(2_500_000)]
        );
        assert_eq!(cleaned.cells("aired").unwrap()[0], Cell::Text("Apr 2009".to_string()));
        assert!(cleaned.cells("studio").is_err());
    }

    #[test]
    fn test_clean_reports_each_stage() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = stages.clone();
        let pipeline = Pipeline::builder()
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap();

        pipeline.clean(anime_raw(), DatasetKind::Anime, "anime").unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                CleaningStage::Normalizing,
                CleaningStage::Reconciling,
                CleaningStage::Coercing,
                CleaningStage::Validating,
            ]
        );
    }

    #[test]
    fn test_clean_missing_required_column_drops_all_rows() {
        let raw = anime_raw().drop("Score").unwrap();
        let pipeline = Pipeline::builder().build().unwrap();
        let cleaned = pipeline.clean(raw, DatasetKind::Anime, "anime").unwrap();

        assert_eq!(cleaned.summary.rows_after, 0);
        assert_eq!(cleaned.data.width(), 9);
        assert!(cleaned.steps.iter().any(|s| s.contains("score")));
    }
}
