// ABOUTME: Reads a previous output CSV so an interrupted or partially skipped run can be resumed.
// ABOUTME: Rows are keyed by localized district and constituency labels and reused instead of refetched.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, ScrapeError};
use crate::rows::OutputRow;

/// Rows from an earlier run, keyed by `(Districts, Electoral Name Clean)`.
#[derive(Debug, Clone, Default)]
pub struct ResumeIndex {
    rows: HashMap<(String, String), OutputRow>,
}

impl ResumeIndex {
    /// Loads `path`, which must carry exactly `expected_header`.
    ///
    /// A different header means a different schema or slot count and is a Reference error.
    pub fn load(path: &Path, expected_header: &[String]) -> Result<Self> {
        let target = path.display().to_string();
        let reference_err =
            |e: anyhow::Error| ScrapeError::reference(&target, "LoadResumeFile", Some(e));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| reference_err(e.into()))?;

        let header: Vec<String> = reader
            .headers()
            .map_err(|e| reference_err(e.into()))?
            .iter()
            .map(str::to_string)
            .collect();
        if header != expected_header {
            return Err(reference_err(anyhow::anyhow!(
                "header has {} columns, expected {}",
                header.len(),
                expected_header.len()
            )));
        }

        let mut rows = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| reference_err(e.into()))?;
            let row = OutputRow::from_cells(record.iter().map(str::to_string).collect());
            let key = row
                .seat_key()
                .map(|(district, seat)| (district.to_string(), seat.to_string()));
            if let Some(key) = key {
                rows.insert(key, row);
            }
        }
        tracing::info!(path = %target, rows = rows.len(), "loaded resume file");
        Ok(Self { rows })
    }

    /// The stored row for a seat, if the earlier run produced one.
    pub fn get(&self, district: &str, seat: &str) -> Option<&OutputRow> {
        self.rows.get(&(district.to_string(), seat.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
