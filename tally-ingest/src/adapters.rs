//! Per-institution column maps and sign conventions.
//!
//! Each supported source exports a different header layout, and two of them
//! record expenses as positive numbers. The registry is pure data: a lookup
//! per source plus a header sniffer for files whose origin the user did not
//! declare.

use tally_core::Source;

/// How one institution's export maps onto the canonical schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceAdapter {
    /// (source-native header, canonical column) pairs.
    pub columns: &'static [(&'static str, &'static str)],
    /// True when the source records expenses as positive amounts, so
    /// normalization must flip every sign.
    pub invert_sign: bool,
}

const WELLS_FARGO: SourceAdapter = SourceAdapter {
    columns: &[
        ("Date", "date"),
        ("Description", "description"),
        ("Amount", "amount"),
    ],
    invert_sign: true,
};

const CHASE: SourceAdapter = SourceAdapter {
    columns: &[
        ("Transaction Date", "date"),
        ("Post Date", "post_date"),
        ("Description", "description"),
        ("Amount", "amount"),
        ("Category", "original_category"),
    ],
    invert_sign: true,
};

const BANK_OF_AMERICA: SourceAdapter = SourceAdapter {
    columns: &[
        ("Posted Date", "date"),
        ("Payee", "description"),
        ("Amount", "amount"),
    ],
    invert_sign: false,
};

const APPLE_PAY: SourceAdapter = SourceAdapter {
    columns: &[
        ("Date", "date"),
        ("Description", "description"),
        ("Amount (USD)", "amount"),
    ],
    invert_sign: false,
};

const SCHWAB: SourceAdapter = SourceAdapter {
    columns: &[
        ("Date", "date"),
        ("Description", "description"),
        ("Amount", "amount"),
    ],
    invert_sign: false,
};

/// Look up the adapter for a known source. Unknown source *identifiers* are
/// rejected earlier, when the id string parses into a [`Source`].
pub fn adapter_for(source: Source) -> &'static SourceAdapter {
    match source {
        Source::WellsFargo => &WELLS_FARGO,
        Source::Chase => &CHASE,
        Source::BankOfAmerica => &BANK_OF_AMERICA,
        Source::ApplePay => &APPLE_PAY,
        Source::Schwab => &SCHWAB,
    }
}

/// Guess the institution from a CSV header row. Best effort only; the caller
/// falls back to an explicit `--source` when this returns None.
pub fn detect_source(headers: &[String]) -> Option<Source> {
    let joined = headers.join(" ").to_lowercase();

    if joined.contains("transaction date") && joined.contains("post date") {
        Some(Source::Chase)
    } else if joined.contains("posted date") && joined.contains("payee") {
        Some(Source::BankOfAmerica)
    } else if joined.contains("apple") || joined.contains("amount (usd)") {
        Some(Source::ApplePay)
    } else if joined.contains("wells") {
        Some(Source::WellsFargo)
    } else if joined.contains("schwab") {
        Some(Source::Schwab)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_source_maps_required_columns() {
        for source in Source::ALL {
            let adapter = adapter_for(source);
            for required in ["date", "description", "amount"] {
                assert!(
                    adapter.columns.iter().any(|(_, canon)| *canon == required),
                    "{source} does not map {required}"
                );
            }
        }
    }

    #[test]
    fn test_expense_positive_sources_invert() {
        assert!(adapter_for(Source::WellsFargo).invert_sign);
        assert!(adapter_for(Source::Chase).invert_sign);
        assert!(!adapter_for(Source::BankOfAmerica).invert_sign);
        assert!(!adapter_for(Source::ApplePay).invert_sign);
        assert!(!adapter_for(Source::Schwab).invert_sign);
    }

    #[test]
    fn test_only_chase_carries_an_original_category() {
        for source in Source::ALL {
            let has_original = adapter_for(source)
                .columns
                .iter()
                .any(|(_, canon)| *canon == "original_category");
            assert_eq!(has_original, source == Source::Chase);
        }
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_chase_header() {
        let h = headers(&["Transaction Date", "Post Date", "Description", "Amount", "Category"]);
        assert_eq!(detect_source(&h), Some(Source::Chase));
    }

    #[test]
    fn test_detect_bank_of_america_header() {
        let h = headers(&["Posted Date", "Payee", "Amount"]);
        assert_eq!(detect_source(&h), Some(Source::BankOfAmerica));
    }

    #[test]
    fn test_detect_apple_pay_by_amount_column() {
        let h = headers(&["Date", "Description", "Amount (USD)"]);
        assert_eq!(detect_source(&h), Some(Source::ApplePay));
    }

    #[test]
    fn test_ambiguous_header_detects_nothing() {
        let h = headers(&["Date", "Description", "Amount"]);
        assert_eq!(detect_source(&h), None);
    }
}
