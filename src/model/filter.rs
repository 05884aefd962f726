//! The type filter and the derivation of the visible list from raw data, filter and query.

use crate::model::{Transaction, TransactionType};
use serde::{Deserialize, Serialize};

/// Which transaction types are visible. `All` is the identity filter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionFilter {
    #[default]
    All,
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionFilter);
serde_plain::derive_fromstr_from_deserialize!(TransactionFilter);

impl TransactionFilter {
    /// Every filter, in the order the filter buttons show them.
    pub const ALL: [TransactionFilter; 3] = [
        TransactionFilter::All,
        TransactionFilter::Income,
        TransactionFilter::Expense,
    ];

    /// The button label.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionFilter::All => "All",
            TransactionFilter::Income => "Income",
            TransactionFilter::Expense => "Expenses",
        }
    }

    pub fn matches(&self, kind: TransactionType) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Income => kind == TransactionType::Income,
            TransactionFilter::Expense => kind == TransactionType::Expense,
        }
    }
}

impl From<TransactionType> for TransactionFilter {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Income => TransactionFilter::Income,
            TransactionType::Expense => TransactionFilter::Expense,
        }
    }
}

/// Derives the visible list.
///
/// Keeps the entries whose type passes `filter` and, when `query` is not blank, whose merchant
/// contains the trimmed `query` ignoring case. The relative order of `transactions` is preserved.
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: TransactionFilter,
    query: &str,
) -> Vec<Transaction> {
    let needle = query.trim().to_lowercase();
    transactions
        .iter()
        .filter(|t| filter.matches(t.kind()))
        .filter(|t| needle.is_empty() || t.merchant().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
