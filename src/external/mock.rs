use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::{DailyBar, Quote};

/// Keyless provider for local development. Prices are a random walk around
/// a per-symbol base so repeated calls stay in a plausible range.
pub struct MockQuoteProvider;

impl MockQuoteProvider {
    pub fn new() -> Self {
        Self
    }

    fn base_price(symbol: &str) -> f64 {
        let seed: u32 = symbol.bytes().map(u32::from).sum();
        20.0 + (seed % 480) as f64
    }
}

impl Default for MockQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        let base = Self::base_price(symbol);
        let price = base * (1.0 + (rand::random::<f64>() - 0.5) * 0.02);

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            timestamp: Utc::now(),
        })
    }

    async fn daily_history(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<DailyBar>, QuoteProviderError> {
        let today = Utc::now().date_naive();
        let mut current = Self::base_price(symbol);
        let mut out = Vec::with_capacity(days as usize);

        for i in (0..days as i64).rev() {
            current *= 1.0 + (rand::random::<f64>() - 0.5) * 0.02;
            let spread = current * 0.01;

            out.push(DailyBar {
                date: today - Duration::days(i),
                open: current - spread,
                high: current + spread,
                low: current - 2.0 * spread,
                close: current,
                volume: (rand::random::<f64>() * 1_000_000.0) as i64,
            });
        }

        Ok(out)
    }
}
