//! The canonical transaction record every source normalizes into.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::month::Month;
use crate::source::Source;

/// One financial event, source-agnostic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Calendar date, no time component.
    pub date: NaiveDate,
    /// Free text as the institution exported it; matching lower-cases a copy.
    pub description: String,
    /// Negative = outflow (expense), positive = inflow (income).
    /// Uniform across sources once normalization has run.
    pub amount: f64,
    pub source: Source,
    /// None only before categorization has run.
    pub category: Option<String>,
    /// Institution-provided label, kept for mapping and audit. Never
    /// overwritten by the pipeline.
    pub original_category: Option<String>,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        source: Source,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            source,
            category: None,
            original_category: None,
        }
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }

    /// The calendar month this transaction falls in.
    pub fn month(&self) -> Month {
        Month::of(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_creation() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let txn = Transaction::new(date, "Trader Joes", -45.0, Source::WellsFargo);
        assert!(txn.is_expense());
        assert!(!txn.is_income());
        assert_eq!(txn.abs_amount(), 45.0);
        assert_eq!(txn.month().to_string(), "2024-01");
        assert_eq!(txn.category, None);
        assert_eq!(txn.original_category, None);
    }

    #[test]
    fn test_zero_amount_is_neither_income_nor_expense() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let txn = Transaction::new(date, "Balance adjustment", 0.0, Source::Chase);
        assert!(!txn.is_expense());
        assert!(!txn.is_income());
    }

    #[test]
    fn test_serde_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
        let mut txn = Transaction::new(date, "Employer Payroll", 2000.0, Source::Chase);
        txn.category = Some("Income".to_string());
        let json = serde_json::to_string(&txn).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, txn);
    }
}
