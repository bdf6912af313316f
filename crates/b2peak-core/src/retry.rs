//! Retry wrapper for NFT sources.
//!
//! Transient failures ([`FetchError::Network`]) are retried with exponential
//! backoff: `base`, `2 * base`, `4 * base`, ... up to `max_retries` extra
//! attempts. [`FetchError::NotFound`] is returned immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::{MarketplaceQuery, NftDetail, NftSource, NftSummary};
use crate::error::FetchError;

/// Wraps an [`NftSource`] and retries transient failures.
#[derive(Debug, Clone)]
pub struct RetryingSource<S> {
    inner: S,
    max_retries: u32,
    base_backoff: Duration,
}

impl<S: NftSource> RetryingSource<S> {
    pub const DEFAULT_RETRIES: u32 = 3;
    pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(100);

    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            max_retries: Self::DEFAULT_RETRIES,
            base_backoff: Self::DEFAULT_BACKOFF,
        }
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }

    async fn retry<T, F, Fut>(&self, op: &'static str, mut call: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, FetchError>> + Send,
        T: Send,
    {
        let mut attempt: u32 = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let backoff = self.base_backoff.saturating_mul(1u32 << attempt.min(16));
                    debug!(
                        op,
                        attempt = attempt.saturating_add(1),
                        max = self.max_retries.saturating_add(1),
                        backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "fetch failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt = attempt.saturating_add(1);
                }
                Err(err) => {
                    if err.is_transient() {
                        warn!(op, retries = self.max_retries, error = %err, "fetch failed after retries");
                    }
                    return Err(err);
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: NftSource> NftSource for RetryingSource<S> {
    async fn list_nfts(&self, query: &MarketplaceQuery) -> Result<Vec<NftSummary>, FetchError> {
        self.retry("list_nfts", || self.inner.list_nfts(query)).await
    }

    async fn get_nft(&self, id: &str) -> Result<NftDetail, FetchError> {
        self.retry("get_nft", || self.inner.get_nft(id)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::catalog::FixtureCatalog;

    /// Fails with a network error `failures` times, then delegates.
    struct FlakySource {
        failures: u32,
        calls: Arc<AtomicU32>,
        inner: FixtureCatalog,
    }

    impl FlakySource {
        fn new(failures: u32) -> (Self, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            (
                Self {
                    failures,
                    calls: Arc::clone(&calls),
                    inner: FixtureCatalog::new(),
                },
                calls,
            )
        }

        fn tick(&self) -> Result<(), FetchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(FetchError::Network {
                    reason: "connection reset".to_owned(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl NftSource for FlakySource {
        async fn list_nfts(&self, query: &MarketplaceQuery) -> Result<Vec<NftSummary>, FetchError> {
            self.tick()?;
            self.inner.list_nfts(query).await
        }

        async fn get_nft(&self, id: &str) -> Result<NftDetail, FetchError> {
            self.tick()?;
            self.inner.get_nft(id).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried() {
        let (flaky, calls) = FlakySource::new(2);
        let source = RetryingSource::new(flaky);

        let items = source.list_nfts(&MarketplaceQuery::default()).await.unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let (flaky, calls) = FlakySource::new(10);
        let source = RetryingSource::new(flaky).with_retries(2);

        let result = source.get_nft("1").await;
        assert!(matches!(result, Err(FetchError::Network { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_not_retried() {
        let (flaky, calls) = FlakySource::new(0);
        let source = RetryingSource::new(flaky);

        let result = source.get_nft("missing").await;
        assert!(matches!(result, Err(FetchError::NotFound { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_doubles_between_attempts() {
        let (flaky, _) = FlakySource::new(3);
        let source = RetryingSource::new(flaky).with_backoff(Duration::from_millis(100));

        let started = tokio::time::Instant::now();
        source.get_nft("1").await.unwrap();
        // 100 + 200 + 400
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(700), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(800), "{elapsed:?}");
    }
}
