//! CSV-backed persistence for transactions and the budget definition.
//!
//! The store is a dumb collaborator: append and load, no deduplication, no
//! transformation. Normalization and categorization happen before anything
//! lands here.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use tally_core::{Budget, Transaction};

pub fn transactions_path(dir: &Path) -> PathBuf {
    dir.join("transactions.csv")
}

pub fn budget_path(dir: &Path) -> PathBuf {
    dir.join("budget.csv")
}

/// Append normalized transactions to the store, writing the header only when
/// the file is new.
pub fn append_transactions(dir: &Path, txns: &[Transaction]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = transactions_path(dir);
    let write_headers = !path.exists() || fs::metadata(&path)?.len() == 0;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(write_headers)
        .from_writer(file);
    for txn in txns {
        wtr.serialize(txn)
            .with_context(|| format!("write {}", path.display()))?;
    }
    wtr.flush()?;

    info!("appended {} transactions to {}", txns.len(), path.display());
    Ok(())
}

/// Load stored transactions, optionally restricted to an inclusive date
/// range. An absent store reads as empty.
pub fn load_transactions(
    dir: &Path,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<Transaction>> {
    let path = transactions_path(dir);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut rdr = csv::Reader::from_path(&path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut txns = Vec::new();
    for result in rdr.deserialize() {
        let txn: Transaction = result.with_context(|| format!("read {}", path.display()))?;
        if let Some((start, end)) = range {
            if txn.date < start || txn.date > end {
                continue;
            }
        }
        txns.push(txn);
    }
    Ok(txns)
}

/// Rewrite the transaction store wholesale. Used by the edit and delete
/// paths, which load, change rows in memory, and write everything back.
pub fn save_transactions(dir: &Path, txns: &[Transaction]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = transactions_path(dir);
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("open {}", path.display()))?;
    for txn in txns {
        wtr.serialize(txn)
            .with_context(|| format!("write {}", path.display()))?;
    }
    wtr.flush()?;

    info!("rewrote {} with {} transactions", path.display(), txns.len());
    Ok(())
}

/// Load the budget definition; an absent file reads as an empty budget.
pub fn load_budget(dir: &Path) -> Result<Vec<Budget>> {
    let path = budget_path(dir);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut rdr = csv::Reader::from_path(&path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut budgets = Vec::new();
    for result in rdr.deserialize() {
        let budget: Budget = result.with_context(|| format!("read {}", path.display()))?;
        budgets.push(budget);
    }
    Ok(budgets)
}

/// Replace the budget definition wholesale.
pub fn save_budget(dir: &Path, budgets: &[Budget]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = budget_path(dir);
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("open {}", path.display()))?;
    for budget in budgets {
        wtr.serialize(budget)
            .with_context(|| format!("write {}", path.display()))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Source;

    fn temp_store(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tally_store_{name}"));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn txn(day: u32, amount: f64) -> Transaction {
        let mut txn = Transaction::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            "trader joes",
            amount,
            Source::WellsFargo,
        );
        txn.category = Some("Groceries".to_string());
        txn
    }

    #[test]
    fn test_append_then_load_round_trips() {
        let dir = temp_store("round_trip");
        append_transactions(&dir, &[txn(15, -45.0)]).unwrap();
        append_transactions(&dir, &[txn(20, -12.5)]).unwrap();

        let loaded = load_transactions(&dir, None).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], txn(15, -45.0));
        assert_eq!(loaded[1], txn(20, -12.5));
    }

    #[test]
    fn test_load_honors_date_range() {
        let dir = temp_store("date_range");
        append_transactions(&dir, &[txn(5, -1.0), txn(15, -2.0), txn(25, -3.0)]).unwrap();

        let range = (
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        );
        let loaded = load_transactions(&dir, Some(range)).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].amount, -2.0);
    }

    #[test]
    fn test_save_replaces_the_whole_store() {
        let dir = temp_store("save_replaces");
        append_transactions(&dir, &[txn(15, -45.0), txn(20, -12.5)]).unwrap();

        let mut txns = load_transactions(&dir, None).unwrap();
        txns.remove(0);
        txns[0].category = Some("Dining".to_string());
        save_transactions(&dir, &txns).unwrap();

        let reloaded = load_transactions(&dir, None).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].amount, -12.5);
        assert_eq!(reloaded[0].category.as_deref(), Some("Dining"));
    }

    #[test]
    fn test_missing_store_reads_empty() {
        let dir = temp_store("missing");
        assert!(load_transactions(&dir, None).unwrap().is_empty());
        assert!(load_budget(&dir).unwrap().is_empty());
    }

    #[test]
    fn test_budget_save_replaces() {
        let dir = temp_store("budget");
        save_budget(&dir, &[Budget::new("Dining", 150.0)]).unwrap();
        save_budget(&dir, &[Budget::new("Dining", 200.0), Budget::new("Travel", 0.0)]).unwrap();

        let budgets = load_budget(&dir).unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].budget_amount, 200.0);
    }
}
