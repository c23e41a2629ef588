//! Writing views and run artefacts to disk.
//!
//! CSV files always start with the view's header row, even when the view is
//! empty. JSON files hold an array of objects keyed by the same headers.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::error::ExportResult;
use crate::logs::LogEntry;
use crate::transform::views::ViewRow;

/// Write a view as CSV with its fixed headers.
pub fn write_csv<T: ViewRow>(path: &Path, rows: &[T]) -> ExportResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ExportResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Write a view as `<dir>/<stem>.<ext>` and return the path written.
pub fn export_view<T: ViewRow>(
    dir: &Path,
    stem: &str,
    format: OutputFormat,
    rows: &[T],
) -> ExportResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", stem, format.extension()));

    match format {
        OutputFormat::Csv => write_csv(&path, rows)?,
        OutputFormat::Json => write_json(&path, rows)?,
    }

    Ok(path)
}

/// Dump log entries as a JSON array.
pub fn write_log_file(path: &Path, entries: &[LogEntry]) -> ExportResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_json(path, entries)
}
