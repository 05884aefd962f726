//! Implements `TransactionSource` with a built-in mock dataset.
//!
//! Note: this is compiled into the binary so that the whole app can be run, top-to-bottom, without
//! any data file.

use crate::error::FetchError;
use crate::model::Transactions;
use crate::source::TransactionSource;

/// Serves a fixed collection held in memory. By default it is seeded with the data in this module.
#[derive(Debug, Clone)]
pub struct SeedSource {
    data: Transactions,
}

impl SeedSource {
    pub fn new(data: Transactions) -> Self {
        Self { data }
    }
}

impl Default for SeedSource {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::new(seed_data())
    }
}

#[async_trait::async_trait]
impl TransactionSource for SeedSource {
    async fn fetch(&self) -> Result<Transactions, FetchError> {
        Ok(self.data.clone())
    }
}

/// Parses the seed CSV. The data is a compile-time constant covered by the tests below, so a
/// failure here is a programming error.
fn seed_data() -> Transactions {
    match Transactions::from_csv(TRANSACTION_DATA.as_bytes()) {
        Ok(data) => data,
        Err(e) => panic!("Seed transaction data is invalid: {e:#}"),
    }
}

/// Seed transaction data.
const TRANSACTION_DATA: &str = r##"id,merchant,amount,date,category,type
txn_001,Acme Corp Payroll,"$4,250.00",2024-01-31T09:00:00Z,Salary,income
txn_002,Whole Foods Market,$87.43,2024-01-30T18:22:00Z,Groceries,expense
txn_003,Blue Bottle Coffee,$6.75,2024-01-30T08:05:00Z,Coffee Shops,expense
txn_004,Shell Gas Station,$52.30,2024-01-29T17:40:00Z,Gas & Fuel,expense
txn_005,Chipotle Mexican Grill,$14.85,2024-01-28T12:35:00Z,Restaurants,expense
txn_006,Upwork Freelance,$640.00,2024-01-27T15:00:00Z,Freelance,income
txn_007,PG&E Electric,$142.67,2024-01-26T06:00:00Z,Utilities,expense
txn_008,Trader Joe's,$63.21,2024-01-25T16:18:00Z,Groceries,expense
txn_009,Peet's Coffee & Tea,$7.25,2024-01-24T09:22:00Z,Coffee Shops,expense
txn_010,Vanguard Dividend,$38.12,2024-01-23T10:00:00Z,Investments,income
txn_011,Comcast Internet,$89.99,2024-01-22T06:30:00Z,Utilities,expense
txn_012,Netflix,$15.49,2024-01-21T00:00:00Z,Entertainment,expense
txn_013,Amazon Refund,$24.99,2024-01-20T13:45:00Z,Shopping,income
txn_014,Costco Wholesale,$118.56,2024-01-19T14:30:00Z,Groceries,expense
txn_015,Starbucks,$5.95,2024-01-18T08:12:00Z,Coffee Shops,expense
txn_016,Acme Corp Payroll,"$4,250.00",2024-01-15T09:00:00Z,Salary,income
txn_017,Olive Garden,$42.30,2024-01-14T19:25:00Z,Restaurants,expense
txn_018,City Apartments Rent,"$1,850.00",2024-01-01T00:00:00Z,Housing,expense
"##;
