use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time market price for a symbol. Ephemeral — only its
/// price survives, as a history point on the asset that requested it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

/// One day of OHLCV data from the quote provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

#[derive(Debug, Serialize)]
pub struct StockHistory {
    pub symbol: String,
    pub days: u32,
    pub history: Vec<DailyBar>,
}
