//! Raw tabular boundary: CSV file to string-keyed rows.
//!
//! The normalizer never touches files; this is the one place ingest does I/O.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

/// One raw statement row, keyed by the source's own header names.
pub type RawRow = HashMap<String, String>;

/// Read a CSV file into raw rows. Short rows are padded with empty cells by
/// the reader being flexible; extra cells beyond the header are dropped.
pub fn read_csv_rows(path: impl AsRef<Path>) -> Result<(Vec<String>, Vec<RawRow>)> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.with_context(|| format!("reading {}", path.display()))?;
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    info!("read {} rows from {}", rows.len(), path.display());
    Ok((headers, rows))
}
