// ABOUTME: CSV output for the finished dataset, written UTF-8 with a single header row.
// ABOUTME: Writes to a sibling temp file and renames it into place so failures never leave partial files.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScrapeError};
use crate::rows::OutputRow;

/// Writes header and rows as CSV to any writer.
pub fn write_records<W: io::Write>(
    writer: W,
    header: &[String],
    rows: &[OutputRow],
) -> csv::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(header)?;
    for row in rows {
        csv_writer.write_record(row.cells())?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("candidates.csv"));
    name.push(".partial");
    path.with_file_name(name)
}

/// Writes the dataset to `path`, replacing any previous file only once the write succeeded.
pub fn write_csv(path: &Path, header: &[String], rows: &[OutputRow]) -> Result<()> {
    let target = path.display().to_string();
    let tmp = temp_path(path);

    let written = fs::File::create(&tmp)
        .map_err(anyhow::Error::from)
        .and_then(|file| write_records(io::BufWriter::new(file), header, rows).map_err(Into::into));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(ScrapeError::output(&target, "WriteCsv", Some(e)));
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ScrapeError::output(&target, "WriteCsv", Some(e.into()))
    })?;
    tracing::info!(path = %target, rows = rows.len(), "dataset written");
    Ok(())
}
