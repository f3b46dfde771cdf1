pub mod asset_queries;
pub mod portfolio_queries;
pub mod price_history_queries;
pub mod sentiment_queries;
pub mod user_queries;
