//! Read-only spending aggregates: monthly pivots, category distributions,
//! and income/expense flows. Pure functions over a transaction slice.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use tally_core::{Month, Source, Transaction};

use crate::category_rules::UNCATEGORIZED;

/// Dense month x category matrix of absolute expense totals. Every (month,
/// category) pair present in the data's span has a cell, zero-filled when
/// nothing was spent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingPivot {
    /// Chronological.
    pub months: Vec<Month>,
    /// Alphabetical.
    pub categories: Vec<String>,
    /// `cells[month_idx][category_idx]`.
    pub cells: Vec<Vec<f64>>,
}

impl SpendingPivot {
    pub fn get(&self, month: Month, category: &str) -> Option<f64> {
        let row = self.months.iter().position(|m| *m == month)?;
        let col = self.categories.iter().position(|c| c == category)?;
        Some(self.cells[row][col])
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFlow {
    pub month: Month,
    /// Sum of positive amounts.
    pub income: f64,
    /// Absolute sum of negative amounts.
    pub expenses: f64,
    /// Raw signed sum.
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantTotal {
    pub description: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceTotal {
    pub source: Source,
    pub total: f64,
}

fn category_of(txn: &Transaction) -> String {
    txn.category
        .clone()
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

/// Group expenses by calendar month and category, summing absolute values.
/// Income is excluded from this view.
pub fn monthly_spending_by_category(txns: &[Transaction]) -> SpendingPivot {
    let mut totals: BTreeMap<(Month, String), f64> = BTreeMap::new();
    let mut months: BTreeSet<Month> = BTreeSet::new();
    let mut categories: BTreeSet<String> = BTreeSet::new();

    for txn in txns.iter().filter(|t| t.is_expense()) {
        let key = (txn.month(), category_of(txn));
        months.insert(key.0);
        categories.insert(key.1.clone());
        *totals.entry(key).or_insert(0.0) += txn.abs_amount();
    }

    let months: Vec<Month> = months.into_iter().collect();
    let categories: Vec<String> = categories.into_iter().collect();
    let cells = months
        .iter()
        .map(|month| {
            categories
                .iter()
                .map(|category| {
                    totals
                        .get(&(*month, category.clone()))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    SpendingPivot { months, categories, cells }
}

/// Absolute expense totals per category, largest first. Only expenses count,
/// whether scoped to one month or across all time; name breaks total ties so
/// the order is stable.
pub fn category_distribution(txns: &[Transaction], month: Option<Month>) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for txn in txns.iter().filter(|t| {
        t.is_expense() && month.is_none_or(|m| m.contains(t.date))
    }) {
        *totals.entry(category_of(txn)).or_insert(0.0) += txn.abs_amount();
    }

    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    sort_descending(&mut out, |t| t.total);
    out
}

/// One record per month present in the data: income, expenses, and the raw
/// signed net. A month with only one sign of activity still reports zero for
/// the other.
pub fn income_vs_expenses(txns: &[Transaction]) -> Vec<MonthlyFlow> {
    let mut flows: BTreeMap<Month, MonthlyFlow> = BTreeMap::new();

    for txn in txns {
        let flow = flows.entry(txn.month()).or_insert_with(|| MonthlyFlow {
            month: txn.month(),
            income: 0.0,
            expenses: 0.0,
            net: 0.0,
        });
        if txn.is_income() {
            flow.income += txn.amount;
        } else if txn.is_expense() {
            flow.expenses += txn.abs_amount();
        }
        flow.net += txn.amount;
    }

    flows.into_values().collect()
}

/// Top `n` descriptions by absolute expense total.
pub fn top_merchants(txns: &[Transaction], n: usize) -> Vec<MerchantTotal> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for txn in txns.iter().filter(|t| t.is_expense()) {
        *totals.entry(txn.description.clone()).or_insert(0.0) += txn.abs_amount();
    }

    let mut out: Vec<MerchantTotal> = totals
        .into_iter()
        .map(|(description, total)| MerchantTotal { description, total })
        .collect();
    sort_descending(&mut out, |t| t.total);
    out.truncate(n);
    out
}

/// Absolute expense totals per institution, largest first.
pub fn spending_by_source(txns: &[Transaction]) -> Vec<SourceTotal> {
    let mut totals: BTreeMap<Source, f64> = BTreeMap::new();
    for txn in txns.iter().filter(|t| t.is_expense()) {
        *totals.entry(txn.source).or_insert(0.0) += txn.abs_amount();
    }

    let mut out: Vec<SourceTotal> = totals
        .into_iter()
        .map(|(source, total)| SourceTotal { source, total })
        .collect();
    sort_descending(&mut out, |t| t.total);
    out
}

/// Sort by total descending; preserves the incoming (keyed) order on ties.
fn sort_descending<T>(items: &mut [T], total: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| {
        total(b)
            .partial_cmp(&total(a))
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(date: (i32, u32, u32), description: &str, amount: f64, category: &str) -> Transaction {
        let mut txn = Transaction::new(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description,
            amount,
            Source::Chase,
        );
        txn.category = Some(category.to_string());
        txn
    }

    fn month(year: i32, month_: u32) -> Month {
        Month::new(year, month_).unwrap()
    }

    #[test]
    fn test_pivot_zero_fills_missing_pairs() {
        let txns = vec![
            txn((2024, 1, 10), "trader joes", -45.0, "Groceries"),
            txn((2024, 1, 12), "shell", -30.0, "Transportation"),
            txn((2024, 2, 3), "safeway", -52.0, "Groceries"),
        ];

        let pivot = monthly_spending_by_category(&txns);
        assert_eq!(pivot.months, vec![month(2024, 1), month(2024, 2)]);
        assert_eq!(pivot.get(month(2024, 1), "Transportation"), Some(30.0));
        // No transportation spend in February, but the cell still exists.
        assert_eq!(pivot.get(month(2024, 2), "Transportation"), Some(0.0));
        assert_eq!(pivot.get(month(2024, 2), "Groceries"), Some(52.0));
    }

    #[test]
    fn test_pivot_excludes_income() {
        let txns = vec![
            txn((2024, 1, 10), "payroll", 2000.0, "Income"),
            txn((2024, 1, 11), "rent", -900.0, "Housing"),
        ];

        let pivot = monthly_spending_by_category(&txns);
        assert_eq!(pivot.categories, vec!["Housing".to_string()]);
        assert_eq!(pivot.get(month(2024, 1), "Housing"), Some(900.0));
    }

    #[test]
    fn test_distribution_sorts_descending_and_skips_income() {
        let txns = vec![
            txn((2024, 1, 10), "trader joes", -45.0, "Groceries"),
            txn((2024, 1, 11), "rent", -900.0, "Housing"),
            txn((2024, 1, 12), "payroll", 2000.0, "Income"),
            txn((2024, 1, 13), "safeway", -55.0, "Groceries"),
        ];

        let dist = category_distribution(&txns, None);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].category, "Housing");
        assert_eq!(dist[0].total, 900.0);
        assert_eq!(dist[1].category, "Groceries");
        assert_eq!(dist[1].total, 100.0);
    }

    #[test]
    fn test_distribution_single_month_still_expenses_only() {
        let txns = vec![
            txn((2024, 1, 10), "trader joes", -45.0, "Groceries"),
            txn((2024, 1, 12), "payroll", 2000.0, "Income"),
            txn((2024, 2, 3), "safeway", -52.0, "Groceries"),
        ];

        let dist = category_distribution(&txns, Some(month(2024, 1)));
        assert_eq!(dist, vec![CategoryTotal { category: "Groceries".to_string(), total: 45.0 }]);
    }

    #[test]
    fn test_income_vs_expenses_reports_both_signs_per_month() {
        let txns = vec![
            txn((2024, 1, 15), "trader joes", -45.0, "Groceries"),
            txn((2024, 1, 20), "payroll", 2000.0, "Income"),
            // February has expenses only.
            txn((2024, 2, 1), "rent", -900.0, "Housing"),
        ];

        let flows = income_vs_expenses(&txns);
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].month, month(2024, 1));
        assert_eq!(flows[0].income, 2000.0);
        assert_eq!(flows[0].expenses, 45.0);
        assert_eq!(flows[0].net, 1955.0);
        assert_eq!(flows[1].income, 0.0);
        assert_eq!(flows[1].expenses, 900.0);
        assert_eq!(flows[1].net, -900.0);
    }

    #[test]
    fn test_top_merchants_truncates() {
        let txns = vec![
            txn((2024, 1, 10), "trader joes", -45.0, "Groceries"),
            txn((2024, 1, 11), "trader joes", -55.0, "Groceries"),
            txn((2024, 1, 12), "shell", -30.0, "Transportation"),
            txn((2024, 1, 13), "netflix", -15.0, "Entertainment"),
        ];

        let merchants = top_merchants(&txns, 2);
        assert_eq!(merchants.len(), 2);
        assert_eq!(merchants[0].description, "trader joes");
        assert_eq!(merchants[0].total, 100.0);
        assert_eq!(merchants[1].description, "shell");
    }

    #[test]
    fn test_spending_by_source() {
        let mut wells = txn((2024, 1, 10), "rent", -900.0, "Housing");
        wells.source = Source::WellsFargo;
        let chase = txn((2024, 1, 11), "trader joes", -45.0, "Groceries");

        let totals = spending_by_source(&[wells, chase]);
        assert_eq!(totals[0].source, Source::WellsFargo);
        assert_eq!(totals[0].total, 900.0);
        assert_eq!(totals[1].source, Source::Chase);
    }
}
