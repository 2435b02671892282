//! Institutions the pipeline knows how to import from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The institution a statement was exported from. Fixed set; anything else
/// fails at normalization time instead of passing through unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "wells_fargo")]
    WellsFargo,
    #[serde(rename = "chase")]
    Chase,
    #[serde(rename = "bank_of_america")]
    BankOfAmerica,
    #[serde(rename = "apple_pay")]
    ApplePay,
    #[serde(rename = "schwab")]
    Schwab,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::WellsFargo,
        Source::Chase,
        Source::BankOfAmerica,
        Source::ApplePay,
        Source::Schwab,
    ];

    /// Stable identifier used in CLI arguments and persisted rows.
    pub fn id(&self) -> &'static str {
        match self {
            Source::WellsFargo => "wells_fargo",
            Source::Chase => "chase",
            Source::BankOfAmerica => "bank_of_america",
            Source::ApplePay => "apple_pay",
            Source::Schwab => "schwab",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.id() == s)
            .ok_or_else(|| Error::UnsupportedSource(s.to_string()))
    }
}
