use crate::model::{Amount, TxnDate};
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

/// Whether money came in or went out. The sign of a transaction lives here, never in its amount.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// A single immutable transaction record.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    id: String,
    merchant: String,
    amount: Amount,
    date: TxnDate,
    category: String,
    #[serde(rename = "type")]
    kind: TransactionType,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        merchant: impl Into<String>,
        amount: Amount,
        date: TxnDate,
        category: impl Into<String>,
        kind: TransactionType,
    ) -> Self {
        Self {
            id: id.into(),
            merchant: merchant.into(),
            amount,
            date,
            category: category.into(),
            kind,
        }
    }

    /// The list key. Unique within a `Transactions` collection.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn merchant(&self) -> &str {
        &self.merchant
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> TxnDate {
        self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }
}

/// An ordered, validated collection of transactions, in the order the data source produced them.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Transaction>", into = "Vec<Transaction>")]
pub struct Transactions {
    data: Vec<Transaction>,
}

impl Transactions {
    /// Validates that every id is unique and every merchant is non-empty.
    pub fn new(data: Vec<Transaction>) -> Result<Self> {
        let mut ids = HashSet::with_capacity(data.len());
        for (ix, transaction) in data.iter().enumerate() {
            if transaction.merchant.trim().is_empty() {
                bail!(
                    "Transaction '{}' at position {ix} has an empty merchant",
                    transaction.id
                );
            }
            if !ids.insert(transaction.id.as_str()) {
                bail!(
                    "Duplicate transaction id '{}' at position {ix}",
                    transaction.id
                );
            }
        }
        Ok(Self { data })
    }

    /// Parses CSV with a header row of `id,merchant,amount,date,category,type`. Column order does
    /// not matter.
    pub fn from_csv(reader: impl Read) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut data = Vec::new();
        for (ix, record) in rdr.deserialize().enumerate() {
            let transaction: Transaction =
                record.with_context(|| format!("Unable to parse transaction row {}", ix + 2))?;
            data.push(transaction);
        }
        Self::new(data)
    }

    pub fn data(&self) -> &[Transaction] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.data.iter()
    }
}

impl TryFrom<Vec<Transaction>> for Transactions {
    type Error = anyhow::Error;

    fn try_from(value: Vec<Transaction>) -> Result<Self> {
        Transactions::new(value)
    }
}

impl From<Transactions> for Vec<Transaction> {
    fn from(value: Transactions) -> Self {
        value.data
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
