//! Network simulation: a fixed latency before every fetch and a chance that the fetch fails.

use crate::error::FetchError;
use crate::model::Transactions;
use crate::source::TransactionSource;
use crate::Result;
use anyhow::bail;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// The latency of the mock backend.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

/// The probability of a mock fetch failing.
pub const DEFAULT_FAILURE_RATE: f64 = 0.05;

/// Wraps a `TransactionSource`, sleeping for `latency` and then failing with probability
/// `failure_rate` before delegating to the inner source.
#[derive(Debug)]
pub struct Simulated<S> {
    inner: S,
    latency: Duration,
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl<S> Simulated<S> {
    /// # Errors
    /// - `failure_rate` is not within `[0, 1]`.
    pub fn new(inner: S, latency: Duration, failure_rate: f64) -> Result<Self> {
        Self::with_rng(inner, latency, failure_rate, StdRng::from_entropy())
    }

    /// Same as `new` with a caller-provided random number generator, e.g. a seeded one.
    pub fn with_rng(inner: S, latency: Duration, failure_rate: f64, rng: StdRng) -> Result<Self> {
        if !(0.0..=1.0).contains(&failure_rate) {
            bail!("The failure rate must be between 0 and 1, got {failure_rate}");
        }
        Ok(Self {
            inner,
            latency,
            failure_rate,
            rng: Mutex::new(rng),
        })
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn roll_failure(&self) -> bool {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_bool(self.failure_rate)
    }
}

#[async_trait::async_trait]
impl<S> TransactionSource for Simulated<S>
where
    S: TransactionSource,
{
    async fn fetch(&self) -> std::result::Result<Transactions, FetchError> {
        debug!("Simulating {}ms of network latency", self.latency.as_millis());
        tokio::time::sleep(self.latency).await;
        if self.roll_failure() {
            warn!("Injecting a simulated fetch failure");
            return Err(FetchError::Simulated);
        }
        self.inner.fetch().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SeedSource;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_latency_then_data() {
        let source = Simulated::new(SeedSource::default(), DEFAULT_LATENCY, 0.0).unwrap();
        let start = Instant::now();
        let data = source.fetch().await.unwrap();
        assert!(start.elapsed() >= DEFAULT_LATENCY);
        assert!(!data.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_fails() {
        let source = Simulated::new(SeedSource::default(), Duration::from_millis(5), 1.0).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err, FetchError::Simulated);
        assert_eq!(err.to_string(), "Failed to fetch transactions");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_rate_is_roughly_honoured() {
        let source = Simulated::with_rng(
            SeedSource::default(),
            Duration::ZERO,
            DEFAULT_FAILURE_RATE,
            StdRng::seed_from_u64(42),
        )
        .unwrap();
        let mut failures = 0;
        for _ in 0..2000 {
            if source.fetch().await.is_err() {
                failures += 1;
            }
        }
        // a fair 5% coin lands near 100
        assert!((40..=180).contains(&failures), "{failures} failures");
    }

    #[test]
    fn test_rejects_bad_rates() {
        assert!(Simulated::new(SeedSource::default(), Duration::ZERO, 1.5).is_err());
        assert!(Simulated::new(SeedSource::default(), Duration::ZERO, -0.1).is_err());
        assert!(Simulated::new(SeedSource::default(), Duration::ZERO, f64::NAN).is_err());
    }
}
