//! Integration tests for the catalog cleaning pipeline.
//!
//! These tests run the pipeline end to end on small fixture files copied
//! into temporary directories.

use catalog_clean::io::load_csv;
use catalog_clean::reporting::{REPORT_FILE_NAME, write_report};
use catalog_clean::{
    BatchRunner, Cell, CleanedDataset, CleanerConfig, DatasetJob, DatasetKind, FieldType, Pipeline,
    is_valid_url,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Copy a fixture into `dir` so outputs never land next to the fixtures.
fn stage_fixture(dir: &Path, fixture: &str) -> PathBuf {
    let target = dir.join(fixture);
    fs::copy(fixtures_path().join(fixture), &target).expect("Failed to copy fixture");
    target
}

fn clean_fixture(fixture: &str, kind: DatasetKind) -> CleanedDataset {
    let raw = load_csv(&fixtures_path().join(fixture)).expect("Failed to load fixture");
    Pipeline::builder()
        .build()
        .unwrap()
        .clean(raw, kind, fixture)
        .expect("Cleaning failed")
}

fn header_of(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Check every invariant a cleaned table must satisfy.
fn assert_cleaned_invariants(cleaned: &CleanedDataset) {
    let fields = cleaned.kind.rules().fields();
    let names: Vec<&str> = cleaned
        .data
        .get_column_names()
        .into_iter()
        .map(|s| s.as_str())
        .collect();
    let expected: Vec<&str> = fields.iter().map(|f| f.name).collect();
    assert_eq!(names, expected);

    for field in fields {
        let cells = cleaned.cells(field.name).unwrap();
        assert_eq!(cells.len(), cleaned.height());
        for cell in &cells {
            if field.required {
                assert!(!cell.is_missing(), "required '{}' is missing", field.name);
            }
            match (field.field_type, cell) {
                (_, Cell::Missing) => {}
                (FieldType::Url, Cell::Url(url)) => assert!(is_valid_url(url), "bad url {url}"),
                (FieldType::Integer, Cell::Integer(_)) => {}
                (FieldType::Decimal, Cell::Decimal(v)) => assert!(v.is_finite()),
                (FieldType::Date, Cell::Date(_)) => {}
                (FieldType::Text, Cell::Text(s)) => assert_eq!(s.trim(), s),
                (ty, cell) => panic!("'{}' declared {ty} holds {cell:?}", field.name),
            }
        }
    }
}

// ============================================================================
// Anime
// ============================================================================

#[test]
fn test_anime_rank_is_coerced_to_integer() {
    let cleaned = clean_fixture("anime_sample.csv", DatasetKind::Anime);

    let titles = cleaned.cells("title").unwrap();
    let ranks = cleaned.cells("rank").unwrap();
    let episodes = cleaned.cells("episodes").unwrap();
    let idx = titles
        .iter()
        .position(|t| *t == Cell::Text("Steins;Gate".to_string()))
        .expect("Steins;Gate should be retained");

    assert_eq!(ranks[idx], Cell::Integer(7));
    assert_eq!(episodes[idx], Cell::Integer(12));
    assert_cleaned_invariants(&cleaned);
}

#[test]
fn test_anime_drops_malformed_url_and_missing_title() {
    let cleaned = clean_fixture("anime_sample.csv", DatasetKind::Anime);

    assert_eq!(cleaned.summary.rows_before, 5);
    assert_eq!(cleaned.summary.rows_after, 3);
    assert_eq!(cleaned.validation.invalid_url_rows, 1);
    assert_eq!(cleaned.validation.missing_required_rows, 1);

    let ranks = cleaned.cells("rank").unwrap();
    assert_eq!(
        ranks,
        vec![Cell::Integer(1), Cell::Integer(7), Cell::Integer(5)]
    );
}

#[test]
fn test_anime_optional_garbage_becomes_missing() {
    let cleaned = clean_fixture("anime_sample.csv", DatasetKind::Anime);
    let episodes = cleaned.cells("episodes").unwrap();
    assert_eq!(episodes[2], Cell::Missing);
    assert_eq!(cleaned.cells("members").unwrap()[0], Cell::Integer(3_744_541));
}

#[test]
fn test_missing_score_column_drops_every_row() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anime_noscore.csv");
    fs::write(
        &path,
        "Rank,Title,Anime URL,Image URL\n\
         1,Monster,https://a.test/1,https://i.test/1.jpg\n\
         2,Mushishi,https://a.test/2,https://i.test/2.jpg\n",
    )
    .unwrap();

    let raw = load_csv(&path).unwrap();
    let cleaned = Pipeline::builder()
        .build()
        .unwrap()
        .clean(raw, DatasetKind::Anime, "anime_noscore")
        .unwrap();

    assert_eq!(cleaned.summary.rows_before, 2);
    assert_eq!(cleaned.summary.rows_after, 0);
    assert_eq!(cleaned.data.width(), 9);
}

#[test]
fn test_image_url_not_a_url_drops_row() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anime_one.csv");
    fs::write(
        &path,
        "Rank,Title,Score,Anime URL,Image URL\n1,Monster,8.9,https://a.test/1,not-a-url\n",
    )
    .unwrap();

    let raw = load_csv(&path).unwrap();
    let cleaned = Pipeline::builder()
        .build()
        .unwrap()
        .clean(raw, DatasetKind::Anime, "anime_one")
        .unwrap();

    assert_eq!(cleaned.summary.rows_after, 0);
    assert_eq!(cleaned.validation.invalid_url_rows, 1);
}

// ============================================================================
// Movie and Netflix
// ============================================================================

#[test]
fn test_movie_invalid_release_date_drops_row() {
    let cleaned = clean_fixture("movie_sample.csv", DatasetKind::Movie);

    let titles = cleaned.cells("Title").unwrap();
    assert!(!titles.contains(&Cell::Text("The Batman".to_string())));
    assert_eq!(cleaned.summary.rows_before, 4);
    assert_eq!(cleaned.summary.rows_after, 2);
    assert_eq!(
        cleaned.cells("ReleaseDate").unwrap()[0],
        Cell::Date(chrono::NaiveDate::from_ymd_opt(2021, 12, 15).unwrap())
    );
    assert_eq!(cleaned.cells("PosterUrl").unwrap()[1], Cell::Missing);
    assert_cleaned_invariants(&cleaned);
}

#[test]
fn test_netflix_rename_and_required_year() {
    let cleaned = clean_fixture("netflix_sample.csv", DatasetKind::NetflixCatalog);

    assert_eq!(cleaned.summary.rows_after, 3);
    assert_eq!(
        cleaned.cells("ShowId").unwrap(),
        vec![
            Cell::Text("s1".to_string()),
            Cell::Text("s2".to_string()),
            Cell::Text("s4".to_string()),
        ]
    );
    assert_eq!(
        cleaned.cells("Genres").unwrap()[1],
        Cell::Text("International TV Shows, TV Dramas".to_string())
    );
    assert_eq!(
        cleaned.cells("Description").unwrap()[2],
        Cell::Text("Extra spaces".to_string())
    );
    assert_cleaned_invariants(&cleaned);
}

#[test]
fn test_strip_non_ascii_option() {
    let raw = load_csv(&fixtures_path().join("netflix_sample.csv")).unwrap();
    let config = CleanerConfig::builder().strip_non_ascii(true).build().unwrap();
    let cleaned = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .clean(raw, DatasetKind::NetflixCatalog, "netflix")
        .unwrap();

    assert_eq!(
        cleaned.cells("Title").unwrap()[2],
        Cell::Text("Caf Seor".to_string())
    );

    let unstripped = clean_fixture("netflix_sample.csv", DatasetKind::NetflixCatalog);
    assert_eq!(
        unstripped.cells("Title").unwrap()[2],
        Cell::Text("Café Señor".to_string())
    );
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_row_accounting_matches_validation() {
    for (fixture, kind) in [
        ("anime_sample.csv", DatasetKind::Anime),
        ("movie_sample.csv", DatasetKind::Movie),
        ("netflix_sample.csv", DatasetKind::NetflixCatalog),
    ] {
        let cleaned = clean_fixture(fixture, kind);
        let summary = &cleaned.summary;
        assert!(summary.rows_after <= summary.rows_before);
        assert_eq!(
            summary.rows_before - summary.rows_after,
            cleaned.validation.dropped_rows,
            "{fixture}"
        );
        assert_eq!(summary.rows_dropped, cleaned.validation.dropped_rows);
    }
}

#[test]
fn test_cleaning_is_idempotent() {
    let dir = TempDir::new().unwrap();

    for (fixture, kind) in [
        ("anime_sample.csv", DatasetKind::Anime),
        ("movie_sample.csv", DatasetKind::Movie),
        ("netflix_sample.csv", DatasetKind::NetflixCatalog),
    ] {
        let input = stage_fixture(dir.path(), fixture);
        let runner = BatchRunner::new(Pipeline::builder().build().unwrap());

        let first = runner.run(&[DatasetJob::new(&input).with_kind(kind)]);
        let first_output = first.summaries[0].output.clone().unwrap();
        let second = runner.run(&[DatasetJob::new(&first_output).with_kind(kind)]);
        let second_output = second.summaries[0].output.clone().unwrap();

        assert_eq!(second.summaries[0].rows_before, first.summaries[0].rows_after);
        assert_eq!(second.summaries[0].rows_after, first.summaries[0].rows_after);
        assert_eq!(
            fs::read_to_string(&first_output).unwrap(),
            fs::read_to_string(&second_output).unwrap(),
            "{fixture}"
        );
    }
}

// ============================================================================
// Batch Runner
// ============================================================================

#[test]
fn test_batch_continues_past_unreadable_file() {
    let dir = TempDir::new().unwrap();
    let anime = stage_fixture(dir.path(), "anime_sample.csv");
    let netflix = stage_fixture(dir.path(), "netflix_sample.csv");
    // A directory where a file is expected cannot be read.
    let broken = dir.path().join("movie_broken.csv");
    fs::create_dir(&broken).unwrap();

    let out = dir.path().join("out");
    let config = CleanerConfig::builder().output_dir(&out).build().unwrap();
    let report = BatchRunner::new(Pipeline::builder().config(config).build().unwrap()).run(&[
        DatasetJob::new(&anime),
        DatasetJob::new(&broken),
        DatasetJob::new(&netflix),
    ]);

    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.summaries[0].name, "anime_sample");
    assert_eq!(report.summaries[1].name, "netflix_sample");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].input, broken);
    assert_eq!(report.failures[0].code, "UNREADABLE");

    assert!(out.join("anime_sample_clean.csv").exists());
    assert!(out.join("netflix_sample_clean.csv").exists());
    assert!(!out.join("movie_broken_clean.csv").exists());
}

#[test]
fn test_batch_reports_missing_file_and_unknown_kind() {
    let dir = TempDir::new().unwrap();
    let unknown = dir.path().join("shows.csv");
    fs::write(&unknown, "a,b\n1,2\n").unwrap();

    let report = BatchRunner::new(Pipeline::builder().build().unwrap()).run(&[
        DatasetJob::new(dir.path().join("anime_missing.csv")),
        DatasetJob::new(&unknown),
    ]);

    let codes: Vec<&str> = report.failures.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(codes, vec!["FILE_NOT_FOUND", "UNKNOWN_DATASET_KIND"]);
    assert!(report.summaries.is_empty());
}

#[test]
fn test_output_header_is_canonical() {
    let dir = TempDir::new().unwrap();
    let movie = stage_fixture(dir.path(), "movie_sample.csv");

    let report = BatchRunner::new(Pipeline::builder().build().unwrap()).run(&[DatasetJob::new(&movie)]);
    let output = report.summaries[0].output.clone().unwrap();

    assert_eq!(output, dir.path().join("movie_sample_clean.csv"));
    assert_eq!(
        header_of(&output),
        "ReleaseDate,Title,Overview,Popularity,VoteCount,VoteAverage,OriginalLanguage,Genre,PosterUrl"
    );

    let reloaded = load_csv(&output).unwrap();
    let dates = reloaded.column("ReleaseDate").unwrap().as_materialized_series().clone();
    assert_eq!(dates.str().unwrap().get(0), Some("2021-12-15"));
}

#[test]
fn test_extra_columns_are_not_emitted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anime_extra.csv");
    fs::write(
        &path,
        "Rank,Title,Score,Anime URL,Image URL,Studio\n1,Monster,8.9,https://a.test/1,https://i.test/1.jpg,Madhouse\n",
    )
    .unwrap();

    let report = BatchRunner::new(Pipeline::builder().build().unwrap()).run(&[DatasetJob::new(&path)]);
    let output = report.summaries[0].output.clone().unwrap();
    assert!(!header_of(&output).contains("Studio"));
    assert!(!header_of(&output).contains("studio"));
}

#[test]
fn test_emit_report_writes_json() {
    let dir = TempDir::new().unwrap();
    let anime = stage_fixture(dir.path(), "anime_sample.csv");

    let report = BatchRunner::new(Pipeline::builder().build().unwrap()).run(&[DatasetJob::new(&anime)]);
    let path = write_report(&report, dir.path()).unwrap();

    assert_eq!(path, dir.path().join(REPORT_FILE_NAME));
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["summaries"][0]["kind"], "anime");
    assert_eq!(json["summaries"][0]["rows_before"], 5);
    assert_eq!(json["summaries"][0]["rows_after"], 3);
    assert!(json.get("failures").is_none());
}

#[test]
fn test_cleaned_dtypes_follow_field_types() {
    let cleaned = clean_fixture("movie_sample.csv", DatasetKind::Movie);
    let dtype = |name: &str| cleaned.data.column(name).unwrap().dtype().clone();

    assert_eq!(dtype("ReleaseDate"), DataType::Date);
    assert_eq!(dtype("VoteCount"), DataType::Int64);
    assert_eq!(dtype("VoteAverage"), DataType::Float64);
    assert_eq!(dtype("Title"), DataType::String);
    assert_eq!(dtype("PosterUrl"), DataType::String);
}
