use std::net::SocketAddr;

use anyhow::Context;
use tracing::warn;
use uuid::Uuid;

/// Runtime configuration gathered from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub quote_provider: String,
    pub quote_cache_ttl_secs: i64,
    pub sentiment_classifier: String,
    pub hf_api_token: Option<String>,
    pub twitter_bearer_token: Option<String>,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a valid socket address")?;

        let quote_cache_ttl_secs = std::env::var("QUOTE_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(300);

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                warn!("⚠️ JWT_SECRET is not set - using an ephemeral secret, tokens will not survive a restart");
                format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
            }
        };

        let access_token_expire_minutes = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(30);

        Ok(Self {
            database_url,
            bind_addr,
            quote_provider: std::env::var("QUOTE_PROVIDER")
                .unwrap_or_else(|_| "yahoo".to_string()),
            quote_cache_ttl_secs,
            sentiment_classifier: std::env::var("SENTIMENT_CLASSIFIER")
                .unwrap_or_else(|_| "keyword".to_string()),
            hf_api_token: std::env::var("HF_API_TOKEN").ok(),
            twitter_bearer_token: std::env::var("TWITTER_BEARER_TOKEN").ok(),
            jwt_secret,
            access_token_expire_minutes,
        })
    }
}
