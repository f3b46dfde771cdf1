use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// One social post mentioning a ticker.
#[derive(Debug, Clone)]
pub struct Post {
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum PostSourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait PostSource: Send + Sync {
    async fn recent_posts(&self, symbol: &str, count: u32) -> Result<Vec<Post>, PostSourceError>;
}
