use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DailyBar, Quote};

#[derive(Debug, Error)]
pub enum QuoteProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("no data for symbol {0}")]
    NoData(String),
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError>;

    async fn daily_history(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<DailyBar>, QuoteProviderError>;
}
