//! Descriptive statistics and charts for cleaned tables.
//!
//! The analysis stage works on any table. It has its own lenient loading
//! policy ([`load_and_cast`]) that is deliberately looser than the cleaning
//! coercion: it is meant for exploring a file, not for enforcing a schema.

use super::charts::{self, HISTOGRAM_BINS, file_stem_component};
use crate::cleaner::{cells_to_series, parse_date};
use crate::error::{CleaningError, Result};
use crate::io::load_csv;
use crate::types::{Cell, FieldType};
use crate::utils::{is_datetime_dtype, is_numeric_dtype};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Describe-style statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN with fewer than two values.
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl NumericSummary {
    /// `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            p50: quantile(&sorted, 0.50),
            p75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Per-column profile.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub name: String,
    pub dtype: String,
    pub missing: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
}

/// Statistics for one analyzed table.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub column_stats: Vec<ColumnStats>,
    /// Chart files written for this table.
    pub charts: Vec<PathBuf>,
}

impl DatasetStats {
    pub fn total_missing(&self) -> usize {
        self.column_stats.iter().map(|c| c.missing).sum()
    }
}

impl fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.name)?;
        writeln!(f, "Shape: ({}, {})", self.rows, self.columns)?;

        writeln!(f, "\nColumn types:")?;
        for col in &self.column_stats {
            writeln!(f, "  {:<24} {}", col.name, col.dtype)?;
        }

        writeln!(f, "\nMissing values:")?;
        for col in &self.column_stats {
            writeln!(f, "  {:<24} {}", col.name, col.missing)?;
        }

        let numeric: Vec<(&str, &NumericSummary)> = self
            .column_stats
            .iter()
            .filter_map(|c| c.numeric.as_ref().map(|n| (c.name.as_str(), n)))
            .collect();
        if !numeric.is_empty() {
            writeln!(f, "\nDescriptive statistics:")?;
            writeln!(
                f,
                "  {:<24} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
            )?;
            for (name, s) in numeric {
                writeln!(
                    f,
                    "  {:<24} {:>8} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3} {:>12.3}",
                    name, s.count, s.mean, s.std, s.min, s.p25, s.p50, s.p75, s.max
                )?;
            }
        }
        Ok(())
    }
}

/// Computes statistics and writes charts into a plots directory.
#[derive(Debug, Clone)]
pub struct AnalysisReporter {
    plots_dir: PathBuf,
    echo: bool,
}

impl AnalysisReporter {
    pub fn new(plots_dir: impl Into<PathBuf>) -> Self {
        Self {
            plots_dir: plots_dir.into(),
            echo: true,
        }
    }

    /// Print statistics to stdout (on by default).
    pub fn with_console(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn plots_dir(&self) -> &Path {
        &self.plots_dir
    }

    /// Profile `df` and write its charts.
    ///
    /// Charts written:
    /// - `<name>_missing.svg` when any column has missing values
    /// - `<name>_<col>_hist.svg` per numeric column
    /// - `<name>_boxplot.svg` when there are numeric columns
    /// - `<name>_<col>_top10.svg` per text column
    pub fn analyze(&self, df: &DataFrame, name: &str) -> Result<DatasetStats> {
        fs::create_dir_all(&self.plots_dir)?;
        let stem = file_stem_component(name);

        let mut column_stats = Vec::with_capacity(df.width());
        let mut numeric_values: Vec<(String, Vec<f64>)> = Vec::new();
        let mut text_columns: Vec<&Column> = Vec::new();

        for column in df.get_columns() {
            let dtype = column.dtype();
            let numeric = if is_numeric_dtype(dtype) {
                let values = numeric_values_of(column)?;
                let summary = NumericSummary::from_values(&values);
                if !values.is_empty() {
                    numeric_values.push((column.name().to_string(), values));
                }
                summary
            } else {
                if dtype == &DataType::String {
                    text_columns.push(column);
                }
                None
            };

            column_stats.push(ColumnStats {
                name: column.name().to_string(),
                dtype: dtype.to_string(),
                missing: column.null_count(),
                numeric,
            });
        }

        let mut written = Vec::new();

        let missing: Vec<&ColumnStats> = column_stats.iter().filter(|c| c.missing > 0).collect();
        if !missing.is_empty() {
            let path = self.plots_dir.join(format!("{stem}_missing.svg"));
            let labels: Vec<String> = missing.iter().map(|c| c.name.clone()).collect();
            let values: Vec<f64> = missing.iter().map(|c| c.missing as f64).collect();
            render(
                charts::bar_chart(&path, &format!("{name}: missing values"), &labels, &values, "missing"),
                &path,
            )?;
            written.push(path);
        }

        for (col, values) in &numeric_values {
            let path = self
                .plots_dir
                .join(format!("{stem}_{}_hist.svg", file_stem_component(col)));
            render(
                charts::histogram(&path, &format!("{name}: {col}"), values, HISTOGRAM_BINS),
                &path,
            )?;
            written.push(path);
        }

        if !numeric_values.is_empty() {
            let path = self.plots_dir.join(format!("{stem}_boxplot.svg"));
            render(
                charts::boxplot(&path, &format!("{name}: numeric columns"), &numeric_values),
                &path,
            )?;
            written.push(path);
        }

        for column in text_columns {
            let top = top_values(column, 10)?;
            if top.is_empty() {
                debug!("Skipping top-10 chart for empty column '{}'", column.name());
                continue;
            }
            let path = self
                .plots_dir
                .join(format!("{stem}_{}_top10.svg", file_stem_component(column.name())));
            let labels: Vec<String> = top.iter().map(|(v, _)| truncate_label(v)).collect();
            let values: Vec<f64> = top.iter().map(|(_, n)| *n as f64).collect();
            render(
                charts::bar_chart(
                    &path,
                    &format!("{name}: top {} {}", top.len(), column.name()),
                    &labels,
                    &values,
                    "count",
                ),
                &path,
            )?;
            written.push(path);
        }

        let stats = DatasetStats {
            name: name.to_string(),
            rows: df.height(),
            columns: df.width(),
            column_stats,
            charts: written,
        };

        if self.echo {
            println!("{stats}");
        }
        info!(
            "Analyzed '{}': {} charts in {}",
            name,
            stats.charts.len(),
            self.plots_dir.display()
        );
        Ok(stats)
    }

    /// Write charts comparing several analyzed tables.
    ///
    /// Produces `comparison_missing.svg` and `comparison_records.svg`.
    /// Returns no paths when `stats` is empty.
    pub fn compare(&self, stats: &[DatasetStats]) -> Result<Vec<PathBuf>> {
        if stats.is_empty() {
            warn!("Nothing to compare");
            return Ok(Vec::new());
        }
        fs::create_dir_all(&self.plots_dir)?;

        let labels: Vec<String> = stats.iter().map(|s| s.name.clone()).collect();
        let missing: Vec<f64> = stats.iter().map(|s| s.total_missing() as f64).collect();
        let records: Vec<f64> = stats.iter().map(|s| s.rows as f64).collect();

        let missing_path = self.plots_dir.join("comparison_missing.svg");
        render(
            charts::bar_chart(&missing_path, "Missing values per dataset", &labels, &missing, "missing"),
            &missing_path,
        )?;

        let records_path = self.plots_dir.join("comparison_records.svg");
        render(
            charts::bar_chart(&records_path, "Records per dataset", &labels, &records, "rows"),
            &records_path,
        )?;

        Ok(vec![missing_path, records_path])
    }
}

fn render(result: anyhow::Result<()>, path: &Path) -> Result<()> {
    result.map_err(|e| CleaningError::ChartFailed(format!("{}: {e:#}", path.display())))
}

fn numeric_values_of(column: &Column) -> Result<Vec<f64>> {
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().flatten().filter(|v| v.is_finite()).collect())
}

/// Most frequent non-missing values, highest count first, ties by value.
fn top_values(column: &Column, limit: usize) -> Result<Vec<(String, usize)>> {
    let series = column.as_materialized_series();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in series.str()?.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(v, n)| (v.to_string(), n))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    Ok(ranked)
}

fn truncate_label(value: &str) -> String {
    const MAX: usize = 24;
    if value.chars().count() <= MAX {
        value.to_string()
    } else {
        let head: String = value.chars().take(MAX - 3).collect();
        format!("{head}...")
    }
}

/// Load a CSV with the analysis stage's casting policy.
///
/// - columns whose name contains `date`, `year`, or `time` are parsed as
///   dates; values that fail become null
/// - other columns become `Float64` only when every non-null value parses
///   as a number; otherwise they are left untouched
pub fn load_and_cast(path: &Path) -> Result<DataFrame> {
    let mut df = load_csv(path)?;

    for name in crate::utils::column_names(&df) {
        let series = df.column(&name)?.as_materialized_series().clone();
        if series.dtype() != &DataType::String {
            continue;
        }

        let lowered = name.to_lowercase();
        let cast = if ["date", "year", "time"].iter().any(|k| lowered.contains(k)) {
            Some(cast_dates(&series)?)
        } else {
            cast_numeric(&series)?
        };

        if let Some(cast) = cast {
            debug!("load_and_cast: '{}' -> {}", name, cast.dtype());
            df.replace(&name, cast)?;
        }
    }

    Ok(df)
}

fn cast_dates(series: &Series) -> Result<Series> {
    let cells: Vec<Cell> = series
        .str()?
        .into_iter()
        .map(|v| v.and_then(parse_date).map_or(Cell::Missing, Cell::Date))
        .collect();
    Ok(cells_to_series(series.name().as_str(), FieldType::Date, &cells)?)
}

/// `None` when any non-null value is not a number, or when there are no values.
fn cast_numeric(series: &Series) -> Result<Option<Series>> {
    let mut values = Vec::with_capacity(series.len());
    let mut seen = false;
    for v in series.str()?.into_iter() {
        match v {
            None => values.push(None),
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(parsed) => {
                    seen = true;
                    values.push(Some(parsed));
                }
                Err(_) => return Ok(None),
            },
        }
    }
    if !seen {
        return Ok(None);
    }
    Ok(Some(Series::new(series.name().clone(), values)))
}

/// Whether a column was typed as a date by [`load_and_cast`].
pub fn is_date_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).map(|c| is_datetime_dtype(c.dtype())).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn sample() -> DataFrame {
        df!(
            "rank" => &[Some(1i64), Some(2), Some(3), None],
            "score" => &[Some(9.1f64), Some(8.0), Some(7.5), Some(6.0)],
            "type" => &[Some("TV"), Some("TV"), Some("Movie"), None]
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_summary() {
        let s = NumericSummary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.p25, 1.75);
        assert_eq!(s.p50, 2.5);
        assert_eq!(s.p75, 3.25);
        assert!((s.std - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert!(NumericSummary::from_values(&[]).is_none());
        assert!(NumericSummary::from_values(&[1.0]).unwrap().std.is_nan());
    }

    #[test]
    fn test_analyze_writes_expected_charts() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = AnalysisReporter::new(dir.path()).with_console(false);

        let stats = reporter.analyze(&sample(), "anime_clean").unwrap();

        assert_eq!(stats.rows, 4);
        assert_eq!(stats.total_missing(), 2);
        let names: Vec<String> = stats
            .charts
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "anime_clean_missing.svg",
                "anime_clean_rank_hist.svg",
                "anime_clean_score_hist.svg",
                "anime_clean_boxplot.svg",
                "anime_clean_type_top10.svg",
            ]
        );
        for chart in &stats.charts {
            assert!(chart.exists());
        }
        assert_eq!(stats.column_stats[0].numeric.as_ref().unwrap().count, 3);
    }

    #[test]
    fn test_analyze_skips_missing_chart_when_complete() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = AnalysisReporter::new(dir.path()).with_console(false);
        let df = df!("score" => &[1.0f64, 2.0]).unwrap();

        let stats = reporter.analyze(&df, "m").unwrap();
        assert!(!dir.path().join("m_missing.svg").exists());
        assert_eq!(stats.charts.len(), 2);
    }

    #[test]
    fn test_compare_writes_two_charts() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = AnalysisReporter::new(dir.path()).with_console(false);
        let a = reporter.analyze(&sample(), "a").unwrap();
        let b = reporter.analyze(&sample(), "b").unwrap();

        let paths = reporter.compare(&[a, b]).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(dir.path().join("comparison_missing.svg").exists());
        assert!(dir.path().join("comparison_records.svg").exists());
        assert!(reporter.compare(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_top_values_ordering() {
        let df = df!("t" => &["b", "a", "b", "c", "a", "b"]).unwrap();
        let top = top_values(df.column("t").unwrap(), 2).unwrap();
        assert_eq!(top, vec![("b".to_string(), 3), ("a".to_string(), 2)]);
    }

    #[test]
    fn test_load_and_cast_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netflix.csv");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(
            b"release_year,date_added,score,title,mixed\n\
              2019,\"September 25, 2021\",8.5,A,1\n\
              2020,not a date,,B,x\n",
        )
        .unwrap();

        let df = load_and_cast(&path).unwrap();
        assert!(is_date_column(&df, "release_year"));
        assert!(is_date_column(&df, "date_added"));
        assert_eq!(df.column("date_added").unwrap().null_count(), 1);
        let added = crate::cleaner::series_to_cells(
            df.column("date_added").unwrap().as_materialized_series(),
            FieldType::Date,
        )
        .unwrap();
        assert_eq!(
            added[0],
            Cell::Date(chrono::NaiveDate::from_ymd_opt(2021, 9, 25).unwrap())
        );
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("title").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("mixed").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_display_lists_describe_table() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = AnalysisReporter::new(dir.path()).with_console(false);
        let stats = reporter.analyze(&sample(), "x").unwrap();
        let text = stats.to_string();
        assert!(text.contains("Shape: (4, 3)"));
        assert!(text.contains("25%"));
        assert!(text.contains("score"));
    }
}
