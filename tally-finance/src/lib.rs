//! tally-finance: categorization rules, spending aggregates, and budget
//! comparison over canonical transactions.

pub mod aggregate;
pub mod budget;
pub mod category_rules;

pub use aggregate::{
    CategoryTotal, MerchantTotal, MonthlyFlow, SourceTotal, SpendingPivot, category_distribution,
    income_vs_expenses, monthly_spending_by_category, spending_by_source, top_merchants,
};
pub use budget::{budget_progress, compare_budget};
pub use category_rules::{
    CategoryRules, FALLBACK_CATEGORY, UNCATEGORIZED, categorize_all, category_list,
    income_categories, normalize_signs_by_category,
};
