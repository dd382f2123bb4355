//! Console summary table and JSON batch report.

use crate::error::Result;
use crate::types::BatchReport;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the JSON report written by `--emit-report`.
pub const REPORT_FILE_NAME: &str = "cleaning_report.json";

const RULE_WIDTH: usize = 96;

/// Render the human-readable batch summary.
///
/// One row per cleaned dataset, followed by the list of failures.
pub fn render_summary(report: &BatchReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "CLEANING SUMMARY");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<24} {:<8} {:>10} {:>10} {:>10}  {}",
        "Dataset", "Kind", "Before", "After", "Dropped", "Output"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for s in &report.summaries {
        let output = s
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<24} {:<8} {:>10} {:>10} {:>10}  {}",
            truncate(&s.name, 24),
            s.kind,
            s.rows_before,
            s.rows_after,
            s.rows_dropped,
            output
        );
    }

    if report.summaries.len() > 1 {
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
        let _ = writeln!(
            out,
            "{:<24} {:<8} {:>10} {:>10} {:>10}",
            "total",
            "",
            report.total_rows_before(),
            report.total_rows_after(),
            report.total_rows_before() - report.total_rows_after()
        );
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failures:");
        for failure in &report.failures {
            let _ = writeln!(
                out,
                "  ! {} [{}] {}",
                failure.input.display(),
                failure.code,
                failure.message
            );
        }
    }

    let _ = write!(out, "{rule}");
    out
}

/// Write `report` as pretty JSON to `<dir>/cleaning_report.json`.
pub fn write_report(report: &BatchReport, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_FILE_NAME);
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    info!("Report saved: {}", path.display());
    Ok(path)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleaningError;
    use crate::schema::DatasetKind;
    use crate::types::{CleaningSummary, DatasetFailure};

    fn report() -> BatchReport {
        let mut report = BatchReport::new();
        report.summaries.push(
            CleaningSummary::new("anime", DatasetKind::Anime, 10, 8)
                .with_output(PathBuf::from("out/anime_clean.csv")),
        );
        report
            .summaries
            .push(CleaningSummary::new("movies", DatasetKind::Movie, 5, 5));
        report.failures.push(DatasetFailure::new(
            PathBuf::from("broken.csv"),
            &CleaningError::FileNotFound(PathBuf::from("broken.csv")),
        ));
        report
    }

    #[test]
    fn test_render_summary_lists_datasets_and_failures() {
        let text = render_summary(&report());
        assert!(text.contains("anime"));
        assert!(text.contains("out/anime_clean.csv"));
        assert!(text.contains("total"));
        assert!(text.contains("Failures:"));
        assert!(text.contains("[FILE_NOT_FOUND]"));
    }

    #[test]
    fn test_write_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&report(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), REPORT_FILE_NAME);

        let parsed: BatchReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.summaries.len(), 2);
        assert_eq!(parsed.failures[0].code, "FILE_NOT_FOUND");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-dataset-name", 10), "a-very-...");
    }
}
