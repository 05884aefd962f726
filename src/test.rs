//! Shared test utilities.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::error::FetchError;
use crate::model::{Amount, Transaction, TransactionType, Transactions, TxnDate};
use crate::source::TransactionSource;
use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Builds a transaction dated 2024-01-15 in the "Misc" category.
pub fn txn(id: &str, merchant: &str, amount: &str, kind: TransactionType) -> Transaction {
    Transaction::new(
        id,
        merchant,
        Amount::from_str(amount).unwrap(),
        TxnDate::from_str("2024-01-15T00:00:00Z").unwrap(),
        "Misc",
        kind,
    )
}

/// Three income and two expense transactions.
pub fn sample_transactions() -> Transactions {
    Transactions::new(vec![
        txn("t1", "Acme Payroll", "3000.00", TransactionType::Income),
        txn("t2", "Blue Bottle Coffee", "4.50", TransactionType::Expense),
        txn("t3", "Whole Foods", "82.10", TransactionType::Expense),
        txn("t4", "Coffee Co-op Dividend", "12.00", TransactionType::Income),
        txn("t5", "Freelance Payment", "450.00", TransactionType::Income),
    ])
    .unwrap()
}

/// A `TransactionSource` that sleeps for `latency` and then plays back queued outcomes, falling
/// back to `sample_transactions()` once the queue is empty.
pub struct ScriptedSource {
    latency: Duration,
    outcomes: Mutex<VecDeque<Result<Transactions, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            outcomes: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queues the outcome of a future fetch.
    pub fn push(&self, outcome: Result<Transactions, FetchError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    /// How many fetches have been started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TransactionSource for ScriptedSource {
    async fn fetch(&self) -> Result<Transactions, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcomes.lock().unwrap().pop_front();
        tokio::time::sleep(self.latency).await;
        outcome.unwrap_or_else(|| Ok(sample_transactions()))
    }
}
