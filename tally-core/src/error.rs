//! Structural error taxonomy for statement imports.
//!
//! Row-level failures (bad dates, bad amounts) are not errors in this sense:
//! they travel back to the caller inside the import outcome so a statement
//! with a few broken rows still imports the rest.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The declared source identifier is not in the adapter registry.
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    /// A required canonical column is absent after column mapping.
    /// Fatal to the import call; every missing field is named.
    #[error("statement is missing required column(s): {}", missing.join(", "))]
    SchemaValidation { missing: Vec<String> },

    /// A month argument that does not parse as `YYYY-MM`.
    #[error("invalid month {0:?}, expected YYYY-MM")]
    InvalidMonth(String),
}
