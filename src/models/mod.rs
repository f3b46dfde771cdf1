mod asset;
mod portfolio;
mod price_history;
mod quote;
mod sentiment;
mod user;

pub use asset::{Asset, AssetPerformance, AssetWithPerformance, CreateAsset, UpdateAsset};
pub use portfolio::{
    CreatePortfolio, Portfolio, PortfolioSummary, PortfolioWithSummary, UpdatePortfolio,
};
pub use price_history::PriceHistoryPoint;
pub use quote::{DailyBar, Quote, StockHistory};
pub use sentiment::{
    AnalyzedPost, BatchSentiment, Classification, OverallSentiment, SentimentLabel,
    SentimentResult, SentimentSummary, SentimentTrend, SentimentTrendBucket, SymbolSentiment,
    TextAnalysis, TextInput,
};
pub use user::{CreateUser, LoginRequest, TokenResponse, User};
