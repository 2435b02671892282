//! Budget definitions and the derived comparison records.

use serde::{Deserialize, Serialize};

/// Planned spend ceiling for one category over a budget period (a calendar
/// month).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub category: String,
    /// Non-negative.
    pub budget_amount: f64,
}

impl Budget {
    pub fn new(category: impl Into<String>, budget_amount: f64) -> Self {
        Self {
            category: category.into(),
            budget_amount,
        }
    }
}

/// Budget vs. actual for one category. Derived, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetComparison {
    pub category: String,
    pub budget_amount: f64,
    /// Absolute value of summed expense transactions in the period.
    pub actual_amount: f64,
    /// `budget_amount - actual_amount`; negative means over budget.
    pub difference: f64,
    /// `actual / budget * 100`, rounded to two decimals. None when
    /// `budget_amount` is zero: the division is undefined and reporting
    /// collaborators render it as "N/A" instead of a number.
    pub percentage_used: Option<f64>,
}

impl BudgetComparison {
    pub fn is_over_budget(&self) -> bool {
        matches!(self.percentage_used, Some(pct) if pct > 100.0)
    }

    /// 75-100% used, inclusive.
    pub fn is_near_limit(&self) -> bool {
        matches!(self.percentage_used, Some(pct) if (75.0..=100.0).contains(&pct))
    }
}

/// Roll-up across a full comparison, for the budget summary view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetProgress {
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
    /// None when the total budget is zero, same sentinel rule as the
    /// per-category percentage.
    pub percentage_used: Option<f64>,
    pub over_budget: Vec<BudgetComparison>,
    pub near_limit: Vec<BudgetComparison>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison(pct: Option<f64>) -> BudgetComparison {
        BudgetComparison {
            category: "Dining".to_string(),
            budget_amount: 200.0,
            actual_amount: 0.0,
            difference: 200.0,
            percentage_used: pct,
        }
    }

    #[test]
    fn test_over_budget_threshold() {
        assert!(comparison(Some(100.01)).is_over_budget());
        assert!(!comparison(Some(100.0)).is_over_budget());
        assert!(!comparison(None).is_over_budget());
    }

    #[test]
    fn test_near_limit_band_is_inclusive() {
        assert!(comparison(Some(75.0)).is_near_limit());
        assert!(comparison(Some(100.0)).is_near_limit());
        assert!(!comparison(Some(74.99)).is_near_limit());
        assert!(!comparison(None).is_near_limit());
    }
}
