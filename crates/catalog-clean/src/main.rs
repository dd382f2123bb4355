//! CLI entry point for the catalog cleaning pipeline.

use anyhow::{Context as _, Result};
use catalog_clean::reporting::{AnalysisReporter, render_summary, write_report};
use catalog_clean::{
    BatchRunner, CleanerConfig, DatasetJob, DatasetKind, DatasetStats, Pipeline, load_and_cast,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// CLI-compatible dataset kind enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDatasetKind {
    /// Anime rankings (structural column names)
    Anime,
    /// Movie listings
    Movie,
    /// Netflix catalog
    Netflix,
}

impl From<CliDatasetKind> for DatasetKind {
    fn from(cli: CliDatasetKind) -> Self {
        match cli {
            CliDatasetKind::Anime => DatasetKind::Anime,
            CliDatasetKind::Movie => DatasetKind::Movie,
            CliDatasetKind::Netflix => DatasetKind::NetflixCatalog,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "catalog-clean",
    version,
    about = "Rule-based cleaning of media-catalog CSV exports",
    long_about = "Cleans anime, movie, and Netflix catalog CSV files into a fixed canonical schema.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG    Log filter; takes precedence over --log-level (may be set in .env)\n\n\
                  EXAMPLES:\n  \
                  # Clean three datasets, kinds taken from the file names\n  \
                  catalog-clean clean Top_Anime_data.csv mymoviedb.csv netflix_titles.csv\n\n  \
                  # Clean into a directory and draw charts\n  \
                  catalog-clean clean data/*.csv --output-dir cleaned --analyze\n\n  \
                  # Machine-readable batch report\n  \
                  catalog-clean clean anime.csv --json | jq .summaries"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of the human-readable summary
    ///
    /// Disables all logging; only the final JSON is written.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean CSV files into their canonical schema
    Clean(CleanArgs),
    /// Print statistics and draw charts for existing CSV files
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// CSV files to clean
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Dataset kind for every file
    ///
    /// If not specified, the kind is taken from each file name
    /// (it must contain "anime", "movie", or "netflix").
    #[arg(short, long, value_enum)]
    kind: Option<CliDatasetKind>,

    /// Output directory for cleaned files (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Custom output file name (without extension)
    #[arg(long)]
    output_name: Option<String>,

    /// Suffix appended to the input file stem
    #[arg(long, default_value = catalog_clean::config::DEFAULT_OUTPUT_SUFFIX)]
    suffix: String,

    /// Remove every non-ASCII character from text fields
    #[arg(long)]
    strip_non_ascii: bool,

    /// Analyze each cleaned dataset and draw charts
    #[arg(long)]
    analyze: bool,

    /// Directory for chart files
    #[arg(long, default_value = "plots")]
    plots_dir: PathBuf,

    /// Write cleaning_report.json to the output directory
    #[arg(short = 'r', long)]
    emit_report: bool,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// CSV files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory for chart files
    #[arg(long, default_value = "plots")]
    plots_dir: PathBuf,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // .env may set RUST_LOG, so load it before logging starts
    dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.quiet, cli.json);

    match &cli.command {
        Command::Clean(args) => run_clean(&cli, args),
        Command::Analyze(args) => run_analyze(&cli, args),
    }
}

fn build_config(args: &CleanArgs) -> Result<CleanerConfig> {
    let mut builder = CleanerConfig::builder()
        .output_suffix(&args.suffix)
        .strip_non_ascii(args.strip_non_ascii)
        .generate_analysis(args.analyze)
        .plots_dir(&args.plots_dir);

    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(name) = &args.output_name {
        builder = builder.output_name(name);
    }

    builder.build().context("Invalid command-line options")
}

fn run_clean(cli: &Cli, args: &CleanArgs) -> Result<()> {
    let config = build_config(args)?;
    let report_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut builder = Pipeline::builder().config(config);
    if !cli.quiet && !cli.json {
        builder = builder.on_progress(|update| {
            debug!(
                "[{:.0}%] {} {}: {}",
                update.progress * 100.0,
                update.dataset.as_deref().unwrap_or(""),
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build()?;

    let jobs: Vec<DatasetJob> = args
        .files
        .iter()
        .map(|path| {
            let job = DatasetJob::new(path);
            match args.kind {
                Some(kind) => job.with_kind(kind.into()),
                None => job,
            }
        })
        .collect();

    let report = BatchRunner::new(pipeline)
        .with_console(!cli.json)
        .run(&jobs);

    if args.emit_report {
        let path = write_report(&report, &report_dir)?;
        info!("Report written to: {}", path.display());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_summary(&report));
        if !args.emit_report {
            println!("Use --json for machine-readable output");
        }
    }

    Ok(())
}

fn run_analyze(cli: &Cli, args: &AnalyzeArgs) -> Result<()> {
    let reporter = AnalysisReporter::new(&args.plots_dir).with_console(!cli.json);
    let mut analyzed: Vec<DatasetStats> = Vec::new();

    for path in &args.files {
        let name = file_stem(path);
        let result = load_and_cast(path).and_then(|df| reporter.analyze(&df, &name));
        match result {
            Ok(stats) => analyzed.push(stats),
            Err(e) => error!("Analysis of '{}' failed: {}", path.display(), e),
        }
    }

    if !analyzed.is_empty()
        && let Err(e) = reporter.compare(&analyzed)
    {
        error!("Comparison charts failed: {}", e);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analyzed)?);
    } else {
        info!(
            "Analyzed {} of {} file(s); charts in {}",
            analyzed.len(),
            args.files.len(),
            reporter.plots_dir().display()
        );
    }

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}
