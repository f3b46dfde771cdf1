use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::Quote;

#[derive(Debug, Clone)]
struct CachedQuote {
    quote: Quote,
    fetched_at: DateTime<Utc>,
}

/// Time-bounded memoization of latest-quote lookups, keyed by uppercased
/// symbol. Provider failures are never cached; growth is bounded by the
/// number of distinct symbols requested.
#[derive(Clone)]
pub struct QuoteCache {
    provider: Arc<dyn QuoteProvider>,
    entries: Arc<DashMap<String, CachedQuote>>,
    ttl_secs: i64,
}

impl QuoteCache {
    pub fn new(provider: Arc<dyn QuoteProvider>, ttl_secs: i64) -> Self {
        Self {
            provider,
            entries: Arc::new(DashMap::new()),
            ttl_secs,
        }
    }

    /// Returns the cached quote while it is fresh, otherwise fetches from
    /// the provider and stores the result.
    pub async fn latest(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        let key = symbol.trim().to_uppercase();

        if let Some(entry) = self.entries.get(&key) {
            let cached = entry.value().clone();
            let expiry = cached.fetched_at + Duration::seconds(self.ttl_secs);

            if Utc::now() < expiry {
                return Ok(cached.quote);
            }
            // TTL expired, remove from cache
            drop(entry); // Release the read lock
            self.entries.remove(&key);
        }

        let quote = self.provider.latest_quote(&key).await?;
        self.entries.insert(
            key,
            CachedQuote {
                quote: quote.clone(),
                fetched_at: Utc::now(),
            },
        );
        Ok(quote)
    }

    /// Get the number of cached quotes
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::DailyBar;

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QuoteProvider for CountingProvider {
        async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Quote {
                symbol: symbol.to_string(),
                price: 42.0,
                timestamp: Utc::now(),
            })
        }

        async fn daily_history(
            &self,
            _symbol: &str,
            _days: u32,
        ) -> Result<Vec<DailyBar>, QuoteProviderError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct FailingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QuoteProvider for FailingProvider {
        async fn latest_quote(&self, _symbol: &str) -> Result<Quote, QuoteProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(QuoteProviderError::Network("connection refused".to_string()))
        }

        async fn daily_history(
            &self,
            _symbol: &str,
            _days: u32,
        ) -> Result<Vec<DailyBar>, QuoteProviderError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_hit_within_window_skips_the_provider() {
        let provider = Arc::new(CountingProvider::default());
        let cache = QuoteCache::new(provider.clone(), 300);

        let first = cache.latest("AAPL").await.unwrap();
        let second = cache.latest("AAPL").await.unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        // The cached quote comes back unchanged, original timestamp included.
        assert_eq!(first.timestamp, second.timestamp);
        assert_eq!(first.price, second.price);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_a_refetch() {
        let provider = Arc::new(CountingProvider::default());
        let cache = QuoteCache::new(provider.clone(), 0);

        cache.latest("AAPL").await.unwrap();
        cache.latest("AAPL").await.unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_is_not_cached() {
        let provider = Arc::new(FailingProvider::default());
        let cache = QuoteCache::new(provider.clone(), 300);

        assert!(cache.latest("AAPL").await.is_err());
        assert_eq!(cache.len(), 0);

        assert!(cache.latest("AAPL").await.is_err());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_symbols_are_normalized_to_one_key() {
        let provider = Arc::new(CountingProvider::default());
        let cache = QuoteCache::new(provider.clone(), 300);

        cache.latest("aapl").await.unwrap();
        cache.latest(" AAPL ").await.unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }
}
