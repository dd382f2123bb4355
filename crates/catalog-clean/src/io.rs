//! CSV loading and atomic CSV writing.

use crate::error::{CleaningError, Result, ResultExt};
use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Mode of written CSV files on Unix.
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

/// Load a CSV file with every column read as `String`.
///
/// Invalid UTF-8 is replaced lossily and empty cells become nulls. If the
/// standard parse fails, the content is pre-cleaned (doubled quotes
/// collapsed, blank lines dropped) and parsed once more.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(CleaningError::FileNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| CleaningError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    match parse_csv_bytes(bytes.clone()) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading of '{}' failed: {}", path.display(), e);
        }
    }

    let cleaned = clean_csv_content(&String::from_utf8_lossy(&bytes));
    parse_csv_bytes(cleaned.into_bytes()).map_err(|e| CleaningError::UnparsableCsv {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn parse_csv_bytes(bytes: Vec<u8>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_encoding(CsvEncoding::LossyUtf8),
        )
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

/// Collapse doubled and tripled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `df` to `path` as CSV without ever leaving a partial file behind.
///
/// The table is written to a temporary file in the target directory, which
/// is then renamed over `path`. On error the temporary file is removed.
pub fn write_csv_atomic(df: &mut DataFrame, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".catalog-clean-")
        .suffix(".csv.tmp")
        .tempfile_in(dir)?;

    // Temp files are created owner-only; cleaned outputs are ordinary files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(OUTPUT_MODE))?;
    }

    CsvWriter::new(tmp.as_file_mut())
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context(format!("writing {}", path.display()))?;

    tmp.persist(path).map_err(|e| CleaningError::Io(e.error))?;
    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}
