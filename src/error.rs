pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The one error a fetch can end in. The view-model stores its message in `error` state and
/// never propagates it further.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Injected by `Simulated` to stand in for a network failure.
    #[error("Failed to fetch transactions")]
    Simulated,

    /// The underlying data source could not produce a valid collection.
    #[error("Failed to load transactions: {0}")]
    Source(String),
}

impl FetchError {
    /// Wraps an `anyhow` error chain into a `FetchError::Source`, keeping every cause in the
    /// message.
    pub fn from_error(e: impl Into<Error>) -> Self {
        FetchError::Source(format!("{:#}", e.into()))
    }
}
