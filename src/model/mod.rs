//! Types that represent the core data model, such as `Transaction` and `TransactionFilter`.
mod amount;
mod date;
mod filter;
mod transaction;

pub use amount::{Amount, AmountError};
pub use date::{DateError, TxnDate};
pub use filter::{filter_transactions, TransactionFilter};
pub use transaction::{Transaction, TransactionType, Transactions};
