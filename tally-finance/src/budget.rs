//! Budget vs. actual comparison for one calendar month.

use std::collections::HashMap;

use tally_core::{Budget, BudgetComparison, BudgetProgress, Month, Transaction};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compare actual spending against a budget definition.
///
/// The budget's categories define the row set: a budgeted category with no
/// spend reports `actual_amount = 0`, and spending in an unbudgeted category
/// does not appear at all. Defaults to the current calendar month when none
/// is given. A zero budget yields `percentage_used = None` — the division is
/// undefined and must never surface as infinity or a fault.
pub fn compare_budget(
    txns: &[Transaction],
    budgets: &[Budget],
    month: Option<Month>,
) -> Vec<BudgetComparison> {
    let target = month.unwrap_or_else(Month::current);

    let mut actuals: HashMap<&str, f64> = HashMap::new();
    for txn in txns.iter().filter(|t| t.is_expense() && target.contains(t.date)) {
        if let Some(category) = txn.category.as_deref() {
            *actuals.entry(category).or_insert(0.0) += txn.abs_amount();
        }
    }

    budgets
        .iter()
        .map(|budget| {
            let actual_amount = actuals
                .get(budget.category.as_str())
                .copied()
                .unwrap_or(0.0);
            let percentage_used = if budget.budget_amount > 0.0 {
                Some(round2(actual_amount / budget.budget_amount * 100.0))
            } else {
                None
            };
            BudgetComparison {
                category: budget.category.clone(),
                budget_amount: budget.budget_amount,
                actual_amount,
                difference: budget.budget_amount - actual_amount,
                percentage_used,
            }
        })
        .collect()
}

/// Roll a comparison up into overall utilization plus the rows that are over
/// budget or nearing it.
pub fn budget_progress(comparisons: &[BudgetComparison]) -> BudgetProgress {
    let total_budget: f64 = comparisons.iter().map(|c| c.budget_amount).sum();
    let total_spent: f64 = comparisons.iter().map(|c| c.actual_amount).sum();

    let percentage_used = if total_budget > 0.0 {
        Some(round2(total_spent / total_budget * 100.0))
    } else {
        None
    };

    BudgetProgress {
        total_budget,
        total_spent,
        remaining: total_budget - total_spent,
        percentage_used,
        over_budget: comparisons
            .iter()
            .filter(|c| c.is_over_budget())
            .cloned()
            .collect(),
        near_limit: comparisons
            .iter()
            .filter(|c| c.is_near_limit())
            .cloned()
            .collect(),
    }
}
