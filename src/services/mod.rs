pub mod asset_service;
pub mod portfolio_service;
pub mod price_history_service;
pub mod quote_cache;
pub mod sentiment_service;
pub mod user_service;
pub mod valuation;
