//! tally-core: canonical transaction, budget, and error types for the tally pipeline

pub mod budget;
pub mod error;
pub mod month;
pub mod source;
pub mod transaction;

pub use budget::{Budget, BudgetComparison, BudgetProgress};
pub use error::Error;
pub use month::Month;
pub use source::Source;
pub use transaction::Transaction;
