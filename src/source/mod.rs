//! Data sources the view-model fetches its transactions from.
//!
//! The view-model only knows the `TransactionSource` trait. `SeedSource` and `CsvFileSource`
//! produce data; `Simulated` wraps either one with network latency and random failures.

mod csv_file;
mod seed;
mod simulated;

pub use csv_file::CsvFileSource;
pub use seed::SeedSource;
pub use simulated::{Simulated, DEFAULT_FAILURE_RATE, DEFAULT_LATENCY};

use crate::error::FetchError;
use crate::model::Transactions;
use crate::Config;
use std::sync::Arc;

/// Provides the full, ordered transaction collection, or fails.
#[async_trait::async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch(&self) -> Result<Transactions, FetchError>;
}

/// Builds the source described by `config`: the CSV file at `data_path` when one is configured,
/// otherwise the built-in seed data, behind the configured latency and failure rate.
pub fn from_config(config: &Config) -> crate::Result<Arc<dyn TransactionSource>> {
    let simulated: Arc<dyn TransactionSource> = match config.data_path() {
        Some(path) => Arc::new(Simulated::new(
            CsvFileSource::new(path),
            config.latency(),
            config.failure_rate(),
        )?),
        None => Arc::new(Simulated::new(
            SeedSource::default(),
            config.latency(),
            config.failure_rate(),
        )?),
    };
    Ok(simulated)
}
