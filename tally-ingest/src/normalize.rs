//! Statement normalizer: raw string-keyed rows + a declared source in,
//! canonical transactions plus a per-row error list out.
//!
//! Structural problems (unknown source, missing columns) abort the import.
//! A row whose date or amount will not parse is dropped and recorded, and
//! the rest of the statement still imports.

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use log::info;

use tally_core::{Error, Source, Transaction};

use crate::adapters::{SourceAdapter, adapter_for};
use crate::csv_rows::RawRow;

const REQUIRED_COLUMNS: [&str; 3] = ["date", "description", "amount"];

/// Date formats accepted across the supported institutions, tried in order.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%d %b %Y",
    "%B %d, %Y",
];

/// One skipped row: which row, which field refused to parse, and the raw
/// value, so the caller can surface it without re-reading the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// Zero-based index into the raw input rows.
    pub row: usize,
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: unparseable {} {:?}", self.row, self.field, self.value)
    }
}

/// A partially-successful import: every row that normalized cleanly, plus
/// one [`RowError`] per row that did not.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub transactions: Vec<Transaction>,
    pub errors: Vec<RowError>,
}

/// Normalize raw statement rows from one source into canonical transactions.
///
/// Output row count is at most the input row count, and every output row
/// carries a date, description, amount, and source. Expenses come out
/// negative regardless of the source's native sign convention.
pub fn normalize(rows: &[RawRow], source: Source) -> Result<ImportOutcome, Error> {
    let adapter = adapter_for(source);
    info!("normalizing {} rows from {}", rows.len(), source);

    let mut outcome = ImportOutcome::default();

    for (index, row) in rows.iter().enumerate() {
        let mapped = map_columns(row, adapter);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !mapped.contains_key(*column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::SchemaValidation { missing });
        }

        let date = match parse_date(mapped["date"]) {
            Some(date) => date,
            None => {
                outcome.errors.push(RowError {
                    row: index,
                    field: "date",
                    value: mapped["date"].to_string(),
                });
                continue;
            }
        };

        let mut amount = match parse_amount(mapped["amount"]) {
            Some(amount) => amount,
            None => {
                outcome.errors.push(RowError {
                    row: index,
                    field: "amount",
                    value: mapped["amount"].to_string(),
                });
                continue;
            }
        };
        if adapter.invert_sign {
            amount = -amount;
        }

        outcome.transactions.push(Transaction {
            date,
            description: mapped["description"].trim().to_string(),
            amount,
            source,
            category: None,
            original_category: mapped
                .get("original_category")
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        });
    }

    info!(
        "normalized {} transactions, skipped {} rows",
        outcome.transactions.len(),
        outcome.errors.len()
    );
    Ok(outcome)
}

fn map_columns<'a>(row: &'a RawRow, adapter: &SourceAdapter) -> HashMap<&'static str, &'a str> {
    let mut mapped = HashMap::new();
    for (native, canonical) in adapter.columns {
        if let Some(value) = row.get(*native) {
            mapped.insert(*canonical, value.as_str());
        }
    }
    mapped
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    // ISO datetime exports keep their date part.
    if let Some(prefix) = s.get(..19) {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M:%S") {
            return Some(datetime.date());
        }
    }
    None
}

fn parse_amount(s: &str) -> Option<f64> {
    let cleaned = s.replace(['$', ','], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}
