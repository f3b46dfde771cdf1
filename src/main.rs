use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;

use wealthpulse_backend::app;
use wealthpulse_backend::auth::AuthKeys;
use wealthpulse_backend::config::Config;
use wealthpulse_backend::external::classifier::{KeywordClassifier, SentimentClassifier};
use wealthpulse_backend::external::finbert::FinbertClassifier;
use wealthpulse_backend::external::mock::MockQuoteProvider;
use wealthpulse_backend::external::post_source::PostSource;
use wealthpulse_backend::external::quote_provider::QuoteProvider;
use wealthpulse_backend::external::twitter::TwitterPostSource;
use wealthpulse_backend::external::yahoo::YahooQuoteProvider;
use wealthpulse_backend::logging::{init_logging, LoggingConfig};
use wealthpulse_backend::services::quote_cache::QuoteCache;
use wealthpulse_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    let quote_provider: Arc<dyn QuoteProvider> =
        match config.quote_provider.to_lowercase().as_str() {
            "yahoo" => {
                info!("📊 Using quote provider: Yahoo Finance");
                Arc::new(YahooQuoteProvider::new())
            }
            "mock" => {
                info!("📊 Using quote provider: mock random walk (no external calls)");
                Arc::new(MockQuoteProvider::new())
            }
            other => {
                return Err(format!(
                    "Invalid QUOTE_PROVIDER: {}. Must be 'yahoo' or 'mock'",
                    other
                )
                .into());
            }
        };

    let classifier: Arc<dyn SentimentClassifier> =
        match config.sentiment_classifier.to_lowercase().as_str() {
            "keyword" => {
                info!("📊 Using sentiment classifier: keyword lexicon");
                Arc::new(KeywordClassifier::new())
            }
            "finbert" => {
                let token = config
                    .hf_api_token
                    .clone()
                    .ok_or("SENTIMENT_CLASSIFIER=finbert requires HF_API_TOKEN")?;
                info!("📊 Using sentiment classifier: FinBERT inference endpoint");
                Arc::new(FinbertClassifier::new(token))
            }
            other => {
                return Err(format!(
                    "Invalid SENTIMENT_CLASSIFIER: {}. Must be 'keyword' or 'finbert'",
                    other
                )
                .into());
            }
        };

    let posts: Option<Arc<dyn PostSource>> = match config.twitter_bearer_token.clone() {
        Some(token) => {
            info!("📊 Social post source enabled (Twitter recent search)");
            Some(Arc::new(TwitterPostSource::new(token)))
        }
        None => {
            info!("Social post source disabled - TWITTER_BEARER_TOKEN not set");
            None
        }
    };

    let state = AppState {
        pool,
        quotes: QuoteCache::new(quote_provider.clone(), config.quote_cache_ttl_secs),
        quote_provider,
        classifier,
        posts,
        auth: AuthKeys::new(&config.jwt_secret, config.access_token_expire_minutes),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "🚀 WealthPulse backend running at http://{}/",
        config.bind_addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}
