//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default suffix appended to the input stem to form the output file name.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_clean";

/// Options controlling how free-text cells are sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TextOptions {
    /// Drop every character outside printable ASCII (0x20-0x7E).
    pub strip_non_ascii: bool,
}

/// Configuration for the cleaning pipeline and the batch runner.
///
/// Use [`CleanerConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use catalog_clean::config::CleanerConfig;
///
/// let config = CleanerConfig::builder()
///     .output_dir("cleaned")
///     .strip_non_ascii(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Directory for cleaned CSV files.
    /// If None, each output is written next to its input file.
    /// Default: None
    pub output_dir: Option<PathBuf>,

    /// Custom output file name (without extension), replacing `<stem><suffix>`.
    /// Default: None
    pub output_name: Option<String>,

    /// Suffix appended to the input stem for the output file name.
    /// Default: "_clean"
    pub output_suffix: String,

    /// Text sanitization options applied to text and URL fields.
    /// Default: keep non-ASCII characters
    pub text: TextOptions,

    /// Whether to write cleaned datasets to disk.
    /// When false, results are kept in memory only.
    /// Default: true
    pub save_to_disk: bool,

    /// Whether to run the analysis reporter on each cleaned dataset.
    /// Default: false
    pub generate_analysis: bool,

    /// Directory for chart files written by the analysis reporter.
    /// Default: "plots"
    pub plots_dir: PathBuf,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            output_name: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            text: TextOptions::default(),
            save_to_disk: true,
            generate_analysis: false,
            plots_dir: PathBuf::from("plots"),
        }
    }
}

impl CleanerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.output_suffix.is_empty() {
            return Err(ConfigValidationError::EmptySuffix);
        }

        if contains_separator(&self.output_suffix) {
            return Err(ConfigValidationError::PathSeparator {
                field: "output_suffix".to_string(),
                value: self.output_suffix.clone(),
            });
        }

        if let Some(name) = &self.output_name {
            if name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyOutputName);
            }
            if contains_separator(name) {
                return Err(ConfigValidationError::PathSeparator {
                    field: "output_name".to_string(),
                    value: name.clone(),
                });
            }
        }

        Ok(())
    }
}

fn contains_separator(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Output suffix must not be empty")]
    EmptySuffix,

    #[error("Output name must not be empty")]
    EmptyOutputName,

    #[error("Invalid value for '{field}': '{value}' (must not contain a path separator)")]
    PathSeparator { field: String, value: String },
}

/// Builder for [`CleanerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanerConfigBuilder {
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    output_suffix: Option<String>,
    strip_non_ascii: Option<bool>,
    save_to_disk: Option<bool>,
    generate_analysis: Option<bool>,
    plots_dir: Option<PathBuf>,
}

impl CleanerConfigBuilder {
    /// Set the output directory for cleaned data.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set a custom output file name (without extension).
    ///
    /// Only meaningful for single-file batches; a second dataset resolving
    /// to the same path fails with an output collision.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Set the suffix appended to the input stem.
    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = Some(suffix.into());
        self
    }

    /// Strip characters outside printable ASCII from text fields.
    pub fn strip_non_ascii(mut self, strip: bool) -> Self {
        self.strip_non_ascii = Some(strip);
        self
    }

    /// Enable or disable saving cleaned data to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Enable or disable the analysis stage.
    pub fn generate_analysis(mut self, generate: bool) -> Self {
        self.generate_analysis = Some(generate);
        self
    }

    /// Set the directory for chart files.
    pub fn plots_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.plots_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanerConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleanerConfig, ConfigValidationError> {
        let config = CleanerConfig {
            output_dir: self.output_dir,
            output_name: self.output_name,
            output_suffix: self
                .output_suffix
                .unwrap_or_else(|| DEFAULT_OUTPUT_SUFFIX.to_string()),
            text: TextOptions {
                strip_non_ascii: self.strip_non_ascii.unwrap_or(false),
            },
            save_to_disk: self.save_to_disk.unwrap_or(true),
            generate_analysis: self.generate_analysis.unwrap_or(false),
            plots_dir: self.plots_dir.unwrap_or_else(|| PathBuf::from("plots")),
        };

        config.validate()?;
        Ok(config)
    }
}
