use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use log::warn;
use std::path::{Path, PathBuf};

use tally_core::{Month, Source};
use tally_finance::{
    CategoryRules, budget_progress, categorize_all, category_distribution, category_list,
    compare_budget, income_vs_expenses, monthly_spending_by_category,
    normalize_signs_by_category, spending_by_source, top_merchants,
};
use tally_ingest::{detect_source, normalize, read_csv_rows};

mod config;
mod store;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Statement import, categorization, and budgeting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a statement CSV into the local store
    Import {
        /// Path to the statement CSV
        #[arg(long)]
        csv: PathBuf,

        /// Source id (wells_fargo, chase, bank_of_america, apple_pay,
        /// schwab); detected from the header when omitted
        #[arg(long)]
        source: Option<String>,
    },

    /// Spending and income reports over the stored transactions
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },

    /// Budget definition and comparison
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// List stored transactions with their row numbers
    List {
        /// Restrict to one month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Edit a stored transaction's category or description
    Edit {
        /// Zero-based row number in stored order, as shown by `tally list`
        row: usize,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a stored transaction
    Delete {
        /// Zero-based row number
        row: usize,
    },

    /// List the canonical category names
    Categories,
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Month x category expense matrix
    Monthly,

    /// Expense share per category, largest first
    Distribution {
        /// Restrict to one month (YYYY-MM); all time when omitted
        #[arg(long)]
        month: Option<String>,
    },

    /// Income vs expenses vs net, per month
    Income,

    /// Largest expense descriptions
    Merchants {
        /// How many to show
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Expense totals per institution
    Sources,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Set the monthly ceiling for one category
    Set { category: String, amount: f64 },

    /// Print the budget definition
    Show,

    /// Compare the budget against actual spending
    Compare {
        /// Target month (YYYY-MM); current month when omitted
        #[arg(long)]
        month: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let dir = config::data_dir(&cfg)?;

    match cli.command {
        Command::Import { csv, source } => import(&dir, &cfg, &csv, source),
        Command::Report { command } => report(&dir, command),
        Command::Budget { command } => budget(&dir, command),
        Command::List { month } => list(&dir, month),
        Command::Edit { row, category, description } => edit(&dir, row, category, description),
        Command::Delete { row } => delete(&dir, row),
        Command::Categories => {
            for category in category_list() {
                println!("{category}");
            }
            Ok(())
        }
    }
}

fn import(dir: &Path, cfg: &config::Config, csv: &Path, source: Option<String>) -> Result<()> {
    let (headers, rows) = read_csv_rows(csv)?;

    let source = resolve_source(source, &headers, cfg.default_source.as_deref())
        .with_context(|| format!("importing {}", csv.display()))?;

    let outcome = normalize(&rows, source)?;
    for err in &outcome.errors {
        warn!("{}: {err}", csv.display());
    }

    let txns = categorize_all(&outcome.transactions, &CategoryRules::default());
    store::append_transactions(dir, &txns)?;

    println!(
        "Imported {} transactions from {} ({} rows skipped)",
        txns.len(),
        source,
        outcome.errors.len()
    );
    Ok(())
}

fn report(dir: &Path, command: ReportCommand) -> Result<()> {
    let txns = store::load_transactions(dir, None)?;
    if txns.is_empty() {
        println!("No transactions stored yet — run `tally import` first.");
        return Ok(());
    }

    match command {
        ReportCommand::Monthly => {
            let pivot = monthly_spending_by_category(&txns);
            if pivot.is_empty() {
                println!("No expenses to report.");
                return Ok(());
            }
            print!("{:<10}", "month");
            for category in &pivot.categories {
                print!("  {category:>18}");
            }
            println!();
            for (month, row) in pivot.months.iter().zip(&pivot.cells) {
                print!("{:<10}", month.to_string());
                for cell in row {
                    print!("  {cell:>18.2}");
                }
                println!();
            }
        }

        ReportCommand::Distribution { month } => {
            let month = parse_month(month)?;
            let dist = category_distribution(&txns, month);
            let total: f64 = dist.iter().map(|d| d.total).sum();
            for entry in &dist {
                let share = if total > 0.0 { entry.total / total * 100.0 } else { 0.0 };
                println!("{:<20} {:>12.2}  {share:>6.1}%", entry.category, entry.total);
            }
        }

        ReportCommand::Income => {
            println!(
                "{:<10}{:>12}{:>12}{:>12}",
                "month", "income", "expenses", "net"
            );
            for flow in income_vs_expenses(&txns) {
                println!(
                    "{:<10}{:>12.2}{:>12.2}{:>12.2}",
                    flow.month.to_string(),
                    flow.income,
                    flow.expenses,
                    flow.net
                );
            }
        }

        ReportCommand::Merchants { top } => {
            for merchant in top_merchants(&txns, top) {
                println!("{:<40} {:>12.2}", merchant.description, merchant.total);
            }
        }

        ReportCommand::Sources => {
            for entry in spending_by_source(&txns) {
                println!("{:<20} {:>12.2}", entry.source.to_string(), entry.total);
            }
        }
    }
    Ok(())
}

fn budget(dir: &Path, command: BudgetCommand) -> Result<()> {
    match command {
        BudgetCommand::Set { category, amount } => {
            if amount < 0.0 {
                return Err(anyhow!("budget amount must be non-negative"));
            }
            let mut budgets = store::load_budget(dir)?;
            match budgets.iter_mut().find(|b| b.category == category) {
                Some(existing) => existing.budget_amount = amount,
                None => budgets.push(tally_core::Budget::new(category.clone(), amount)),
            }
            store::save_budget(dir, &budgets)?;
            println!("Budget for {category}: {amount:.2}");
        }

        BudgetCommand::Show => {
            let budgets = store::load_budget(dir)?;
            if budgets.is_empty() {
                println!("No budget defined — run `tally budget set <category> <amount>`.");
                return Ok(());
            }
            for budget in &budgets {
                println!("{:<20} {:>12.2}", budget.category, budget.budget_amount);
            }
        }

        BudgetCommand::Compare { month } => {
            let month = parse_month(month)?;
            let budgets = store::load_budget(dir)?;
            if budgets.is_empty() {
                println!("No budget defined — run `tally budget set <category> <amount>`.");
                return Ok(());
            }
            let txns = store::load_transactions(dir, None)?;
            let comparison = compare_budget(&txns, &budgets, month);

            println!(
                "{:<20}{:>12}{:>12}{:>12}{:>8}",
                "category", "budget", "actual", "diff", "used"
            );
            for row in &comparison {
                let used = match row.percentage_used {
                    Some(pct) => format!("{pct:.1}%"),
                    None => "N/A".to_string(),
                };
                println!(
                    "{:<20}{:>12.2}{:>12.2}{:>12.2}{used:>8}",
                    row.category, row.budget_amount, row.actual_amount, row.difference
                );
            }

            let progress = budget_progress(&comparison);
            let overall = match progress.percentage_used {
                Some(pct) => format!("{pct:.1}%"),
                None => "N/A".to_string(),
            };
            println!(
                "\nTotal: {:.2} budgeted, {:.2} spent, {:.2} remaining ({overall} used)",
                progress.total_budget, progress.total_spent, progress.remaining
            );
            for row in &progress.over_budget {
                println!("Over budget: {} ({:.2} over)", row.category, -row.difference);
            }
            for row in &progress.near_limit {
                println!("Near limit: {}", row.category);
            }
        }
    }
    Ok(())
}

fn list(dir: &Path, month: Option<String>) -> Result<()> {
    let month = parse_month(month)?;
    let txns = store::load_transactions(dir, None)?;

    for (row, txn) in txns.iter().enumerate() {
        if let Some(m) = month {
            if !m.contains(txn.date) {
                continue;
            }
        }
        println!(
            "{row:>5}  {}  {:<40} {:>12.2}  {}",
            txn.date,
            txn.description,
            txn.amount,
            txn.category.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn edit(
    dir: &Path,
    row: usize,
    category: Option<String>,
    description: Option<String>,
) -> Result<()> {
    if category.is_none() && description.is_none() {
        bail!("nothing to change — pass --category and/or --description");
    }

    let mut txns = store::load_transactions(dir, None)?;
    let count = txns.len();
    let txn = txns
        .get_mut(row)
        .ok_or_else(|| anyhow!("no transaction at row {row} ({count} stored)"))?;

    if let Some(description) = description {
        txn.description = description;
    }
    let category_changed = category.is_some();
    if let Some(category) = category {
        txn.category = Some(category);
    }

    // A new category can change the row's nature (expense vs income), so
    // re-align signs the way the categorizer defines them.
    if category_changed {
        txns = normalize_signs_by_category(&txns);
    }
    store::save_transactions(dir, &txns)?;

    println!("Updated row {row}");
    Ok(())
}

fn delete(dir: &Path, row: usize) -> Result<()> {
    let mut txns = store::load_transactions(dir, None)?;
    if row >= txns.len() {
        bail!("no transaction at row {row} ({} stored)", txns.len());
    }
    let removed = txns.remove(row);
    store::save_transactions(dir, &txns)?;

    println!("Deleted {} {} ({:.2})", removed.date, removed.description, removed.amount);
    Ok(())
}

/// Pick the institution for an import. An explicit `--source` always wins,
/// a recognizable header beats the configured default, and the configured
/// default is the last resort. Ordering matters: a default of `wells_fargo`
/// must not override a detectable Chase header, or every sign in that
/// statement gets flipped.
fn resolve_source(
    explicit: Option<String>,
    headers: &[String],
    fallback: Option<&str>,
) -> Result<Source> {
    if let Some(id) = explicit {
        return Ok(id.parse()?);
    }
    if let Some(source) = detect_source(headers) {
        return Ok(source);
    }
    match fallback {
        Some(id) => Ok(id.parse()?),
        None => Err(anyhow!(
            "could not detect the source from the header — pass --source <id>"
        )),
    }
}

fn parse_month(month: Option<String>) -> Result<Option<Month>> {
    month.map(|m| m.parse::<Month>()).transpose().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_explicit_source_beats_detection() {
        let chase = headers(&["Transaction Date", "Post Date", "Description", "Amount"]);
        let source = resolve_source(Some("schwab".to_string()), &chase, Some("wells_fargo"));
        assert_eq!(source.unwrap(), Source::Schwab);
    }

    #[test]
    fn test_detectable_header_beats_configured_default() {
        let chase = headers(&["Transaction Date", "Post Date", "Description", "Amount"]);
        let source = resolve_source(None, &chase, Some("wells_fargo"));
        assert_eq!(source.unwrap(), Source::Chase);
    }

    #[test]
    fn test_configured_default_is_the_last_resort() {
        // Date/Description/Amount is shared by several institutions, so
        // detection has nothing to go on.
        let ambiguous = headers(&["Date", "Description", "Amount"]);
        let source = resolve_source(None, &ambiguous, Some("wells_fargo"));
        assert_eq!(source.unwrap(), Source::WellsFargo);
    }

    #[test]
    fn test_undetectable_without_default_is_an_error() {
        let ambiguous = headers(&["Date", "Description", "Amount"]);
        assert!(resolve_source(None, &ambiguous, None).is_err());
    }

    #[test]
    fn test_unknown_explicit_id_is_rejected() {
        assert!(resolve_source(Some("venmo".to_string()), &[], None).is_err());
    }

    fn temp_store(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tally_cli_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_edit_recategorization_realigns_the_sign() {
        let dir = temp_store("edit_sign");
        let mut txn = tally_core::Transaction::new(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "employer payroll",
            -2000.0,
            Source::WellsFargo,
        );
        txn.category = Some("Miscellaneous".to_string());
        store::append_transactions(&dir, &[txn]).unwrap();

        edit(&dir, 0, Some("Income".to_string()), None).unwrap();

        let txns = store::load_transactions(&dir, None).unwrap();
        assert_eq!(txns[0].category.as_deref(), Some("Income"));
        assert_eq!(txns[0].amount, 2000.0);
    }

    #[test]
    fn test_edit_out_of_range_row_is_an_error() {
        let dir = temp_store("edit_range");
        assert!(edit(&dir, 3, Some("Dining".to_string()), None).is_err());
    }

    #[test]
    fn test_delete_removes_the_row() {
        let dir = temp_store("delete");
        let first = tally_core::Transaction::new(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "trader joes",
            -45.0,
            Source::Chase,
        );
        let second = tally_core::Transaction::new(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            "shell",
            -30.0,
            Source::Chase,
        );
        store::append_transactions(&dir, &[first, second]).unwrap();

        delete(&dir, 0).unwrap();

        let txns = store::load_transactions(&dir, None).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].description, "shell");
    }
}
