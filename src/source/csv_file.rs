use crate::error::FetchError;
use crate::model::Transactions;
use crate::source::TransactionSource;
use crate::utils;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads transactions from a CSV file with an `id,merchant,amount,date,category,type` header. The
/// file is read again on every fetch.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl TransactionSource for CsvFileSource {
    async fn fetch(&self) -> Result<Transactions, FetchError> {
        debug!("Reading transactions from {}", self.path.display());
        let content = utils::read(&self.path).await.map_err(FetchError::from_error)?;
        Transactions::from_csv(content.as_bytes()).map_err(FetchError::from_error)
    }
}
