//! Deterministic category rules: ordered keyword tables plus an
//! institution-label map, applied per batch with a per-row fallback.
//!
//! Keyword matching is a plain case-insensitive substring test and the first
//! category in table order wins, so categorization is reproducible run to
//! run. The tables live in an explicit [`CategoryRules`] value rather than
//! module state, so tests can pass their own.

use tally_core::Transaction;

/// Assigned when no keyword matches a non-empty description.
pub const FALLBACK_CATEGORY: &str = "Miscellaneous";

/// Assigned when there is nothing to match on at all (blank description) or
/// an institution label arrives empty.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Immutable categorization configuration.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    /// Category name -> substring keywords, in precedence order.
    keywords: Vec<(String, Vec<String>)>,
    /// Institution label -> canonical category.
    original_map: Vec<(String, String)>,
}

impl CategoryRules {
    pub fn new(
        keywords: Vec<(String, Vec<String>)>,
        original_map: Vec<(String, String)>,
    ) -> Self {
        Self { keywords, original_map }
    }

    /// First category whose keyword list substring-matches the description.
    /// Ties go to the category declared earlier in the table.
    pub fn match_keywords(&self, description: &str) -> String {
        if description.trim().is_empty() {
            return UNCATEGORIZED.to_string();
        }
        let lowered = description.to_lowercase();
        for (category, keywords) in &self.keywords {
            if keywords.iter().any(|keyword| lowered.contains(keyword.as_str())) {
                return category.clone();
            }
        }
        FALLBACK_CATEGORY.to_string()
    }

    /// Map an institution's own category label to a canonical one. Exact
    /// (case-sensitive) match first, then a case-insensitive containment
    /// pass, then the fallback category.
    pub fn map_original(&self, label: &str) -> String {
        if label.trim().is_empty() {
            return UNCATEGORIZED.to_string();
        }
        for (institution_label, category) in &self.original_map {
            if institution_label == label {
                return category.clone();
            }
        }
        let lowered = label.to_lowercase();
        for (institution_label, category) in &self.original_map {
            if lowered.contains(&institution_label.to_lowercase()) {
                return category.clone();
            }
        }
        FALLBACK_CATEGORY.to_string()
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        // Some keywords repeat across rows ("gas", "interest", "insurance");
        // the earlier row wins, so insurance descriptions land in Health and
        // gas stations in Transportation.
        let keywords = [
            ("Groceries", vec!["trader", "safeway", "grocery", "market", "food", "whole foods", "albertsons", "kroger", "publix", "aldi"]),
            ("Dining", vec!["restaurant", "mcdonalds", "starbucks", "coffee", "doordash", "grubhub", "uber eats", "chipotle", "wendys", "burger", "pizza", "taco", "cafe"]),
            ("Transportation", vec!["uber", "lyft", "gas", "shell", "chevron", "transit", "parking", "exxon", "mobil", "bp", "valero", "toll", "auto", "car"]),
            ("Shopping", vec!["amazon", "target", "walmart", "bestbuy", "ebay", "etsy", "costco", "sams club", "macys", "nordstrom", "tj maxx", "marshalls", "kohls"]),
            ("Entertainment", vec!["netflix", "hbo", "spotify", "movie", "hulu", "disney", "theatre", "theater", "cinema", "apple music", "prime video", "youtube", "games"]),
            ("Housing", vec!["rent", "mortgage", "hoa", "maintenance", "apartment", "property", "lease", "landlord", "home", "house"]),
            ("Utilities", vec!["electric", "water", "gas", "internet", "phone", "utility", "bill", "power", "cable", "comcast", "verizon", "at&t", "sprint", "sewer"]),
            ("Health", vec!["doctor", "pharmacy", "medical", "fitness", "gym", "health", "dental", "vision", "cvs", "walgreens", "hospital", "clinic", "insurance"]),
            ("Insurance", vec!["insurance", "geico", "allstate", "state farm", "progressive", "nationwide", "liberty mutual", "farmers", "policy"]),
            ("Education", vec!["tuition", "course", "book", "school", "university", "college", "student", "loan", "class", "education", "learning"]),
            ("Income", vec!["payroll", "salary", "deposit", "dividend", "direct deposit", "payment received", "interest", "refund", "tax return"]),
            ("Investments", vec!["investment", "transfer to", "schwab", "fidelity", "vanguard", "etrade", "robinhood", "stocks", "bonds", "mutual fund", "retirement"]),
            ("Subscriptions", vec!["subscription", "membership", "monthly", "annual fee", "renewal", "recurring"]),
            ("Travel", vec!["hotel", "flight", "airbnb", "airline", "expedia", "booking.com", "airfare", "vacation", "travel", "resort", "cruise", "tour", "trip"]),
            ("Personal Care", vec!["salon", "haircut", "spa", "beauty", "cosmetics", "barber", "stylist", "nail", "massage"]),
            ("Gifts & Donations", vec!["gift", "donation", "charity", "donate", "present", "gofundme", "fundraiser", "patreon", "kickstarter"]),
            ("Fees & Charges", vec!["fee", "charge", "interest", "overdraft", "penalty", "late", "service charge", "atm fee", "bank fee"]),
        ];

        let original_map = [
            // Chase
            ("Food & Drink", "Dining"),
            ("Groceries", "Groceries"),
            ("Travel", "Travel"),
            ("Shopping", "Shopping"),
            ("Bills & Utilities", "Utilities"),
            ("Health & Wellness", "Health"),
            ("Entertainment", "Entertainment"),
            ("Gas", "Transportation"),
            ("Home", "Housing"),
            ("Education", "Education"),
            ("Personal", "Personal Care"),
            ("Gifts & Donations", "Gifts & Donations"),
            ("Business Services", "Miscellaneous"),
            // Bank of America
            ("Dining", "Dining"),
            ("Grocery", "Groceries"),
            ("Travel & Entertainment", "Entertainment"),
            ("Household Expenses", "Housing"),
            ("Auto & Transport", "Transportation"),
            ("Subscriptions", "Subscriptions"),
            ("Income & Transfers", "Income"),
            // Wells Fargo
            ("Dining Out", "Dining"),
            ("Groceries/Supermarkets", "Groceries"),
            ("Transportation", "Transportation"),
            ("Shopping/Retail", "Shopping"),
            ("Home/Rent", "Housing"),
            ("Utilities", "Utilities"),
            ("Health/Medical", "Health"),
            ("Insurance", "Insurance"),
            ("Education/School", "Education"),
            ("Income", "Income"),
            ("Investments", "Investments"),
            ("Travel/Vacation", "Travel"),
        ];

        CategoryRules {
            keywords: keywords
                .into_iter()
                .map(|(category, words)| {
                    (
                        category.to_string(),
                        words.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
            original_map: original_map
                .into_iter()
                .map(|(label, category)| (label.to_string(), category.to_string()))
                .collect(),
        }
    }
}

/// Every canonical category name, including the fallbacks.
pub fn category_list() -> Vec<&'static str> {
    vec![
        "Groceries", "Dining", "Transportation", "Shopping", "Entertainment",
        "Housing", "Utilities", "Health", "Insurance", "Education",
        "Income", "Investments", "Subscriptions", "Travel", "Personal Care",
        "Gifts & Donations", "Fees & Charges", FALLBACK_CATEGORY, UNCATEGORIZED,
    ]
}

/// Categories whose transactions are inflows by nature.
pub fn income_categories() -> [&'static str; 3] {
    ["Income", "Investments", "Refund"]
}

/// Assign a category to every transaction, returning a new vector.
///
/// When any row in the batch carries an institution label, rows that have
/// one take the mapping path and rows that do not fall back per row. This is
/// deliberately a per-row branch, not a batch toggle: a statement with
/// partial institution metadata categorizes each row on its own merits.
/// Rows that already have a category keep it, which makes the whole pass
/// idempotent.
pub fn categorize_all(txns: &[Transaction], rules: &CategoryRules) -> Vec<Transaction> {
    let batch_has_originals = txns.iter().any(|txn| txn.original_category.is_some());

    txns.iter()
        .map(|txn| {
            let category = match (&txn.original_category, &txn.category) {
                (Some(label), _) if batch_has_originals => rules.map_original(label),
                (_, Some(existing)) => existing.clone(),
                _ => rules.match_keywords(&txn.description),
            };
            Transaction {
                category: Some(category),
                ..txn.clone()
            }
        })
        .collect()
}

/// Force income-category amounts positive and everything else negative.
/// Zero amounts are left alone. Used after a manual category edit, when the
/// stored sign may no longer match the category's nature.
pub fn normalize_signs_by_category(txns: &[Transaction]) -> Vec<Transaction> {
    txns.iter()
        .map(|txn| {
            if txn.amount == 0.0 {
                return txn.clone();
            }
            let is_income_category = txn
                .category
                .as_deref()
                .is_some_and(|category| income_categories().contains(&category));
            let amount = if is_income_category {
                txn.amount.abs()
            } else {
                -txn.amount.abs()
            };
            Transaction { amount, ..txn.clone() }
        })
        .collect()
}
