use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::{DailyBar, Quote};

pub struct YahooQuoteProvider {
    client: reqwest::Client,
}

impl YahooQuoteProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; WealthPulse/1.0)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<ChartResult, QuoteProviderError> {
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{symbol}?range={range}&interval=1d"
        );

        let resp = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| QuoteProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteProviderError::RateLimited);
        }

        let body = resp
            .json::<ChartResponse>()
            .await
            .map_err(|e| QuoteProviderError::Parse(e.to_string()))?;

        if let Some(err) = body.chart.error {
            return Err(QuoteProviderError::BadResponse(err.to_string()));
        }

        body.chart.result
            .and_then(|mut r| r.pop())
            .ok_or_else(|| QuoteProviderError::NoData(symbol.to_string()))
    }
}

impl Default for YahooQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    regular_market_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteArrays>,
}

#[derive(Debug, Deserialize)]
struct QuoteArrays {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<i64>>>,
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    async fn latest_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        let result = self.fetch_chart(symbol, "1d").await?;

        let price = result.meta.regular_market_price
            .ok_or_else(|| QuoteProviderError::NoData(symbol.to_string()))?;

        let timestamp = result.meta.regular_market_time
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(Utc::now);

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            timestamp,
        })
    }

    async fn daily_history(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<DailyBar>, QuoteProviderError> {
        // Yahoo supports ranges like "6mo", "1y". We'll map days roughly.
        let range = if days <= 5 { "5d" }
        else if days <= 30 { "1mo" }
        else if days <= 90 { "3mo" }
        else if days <= 180 { "6mo" }
        else if days <= 365 { "1y" }
        else { "5y" };

        let result = self.fetch_chart(symbol, range).await?;

        let quote = result.indicators.quote
            .into_iter()
            .next()
            .ok_or_else(|| QuoteProviderError::BadResponse("missing quote data".into()))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let opens = quote.open.unwrap_or_default();
        let highs = quote.high.unwrap_or_default();
        let lows = quote.low.unwrap_or_default();
        let closes = quote.close.unwrap_or_default();
        let volumes = quote.volume.unwrap_or_default();

        let mut out = Vec::new();

        for (i, ts) in timestamps.iter().enumerate() {
            // skip bars with a missing close
            let Some(close) = closes.get(i).copied().flatten() else { continue };
            let Some(dt) = DateTime::from_timestamp(*ts, 0) else { continue };

            out.push(DailyBar {
                date: dt.date_naive(),
                open: opens.get(i).copied().flatten().unwrap_or(close),
                high: highs.get(i).copied().flatten().unwrap_or(close),
                low: lows.get(i).copied().flatten().unwrap_or(close),
                close,
                volume: volumes.get(i).copied().flatten().unwrap_or(0),
            });
        }

        // Ensure ascending by date, trimmed to the requested window (the
        // range strings over-fetch).
        out.sort_by_key(|b| b.date);
        let cutoff = Utc::now().date_naive() - Duration::days(days as i64);
        out.retain(|b| b.date >= cutoff);

        Ok(out)
    }
}
