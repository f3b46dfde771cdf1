use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::quote_provider::QuoteProviderError;
use crate::models::{Quote, StockHistory};
use crate::services::asset_service;
use crate::state::AppState;

// Public market-data surface; no auth, mirrors the quote provider.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_stock_quote))
        .route("/:symbol/history", get(get_stock_history))
}

#[derive(Debug, Deserialize)]
pub struct StockHistoryParams {
    pub days: Option<u32>,
}

fn map_provider_error(symbol: &str, e: QuoteProviderError) -> AppError {
    error!("Quote provider failed for {}: {}", symbol, e);
    match e {
        QuoteProviderError::NoData(_) => AppError::NotFound,
        other => AppError::Unavailable(format!("Price source unavailable: {}", other)),
    }
}

pub async fn get_stock_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Quote>, AppError> {
    info!("GET /api/stocks/{} - Fetching quote", symbol);
    let symbol = asset_service::normalize_symbol(&symbol)?;
    let quote = state
        .quotes
        .latest(&symbol)
        .await
        .map_err(|e| map_provider_error(&symbol, e))?;
    Ok(Json(quote))
}

pub async fn get_stock_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<StockHistoryParams>,
) -> Result<Json<StockHistory>, AppError> {
    let symbol = asset_service::normalize_symbol(&symbol)?;
    let days = params.days.unwrap_or(30);
    info!("GET /api/stocks/{}/history - Last {} days", symbol, days);
    if !(1..=1825).contains(&days) {
        return Err(AppError::Validation(
            "days must be between 1 and 1825".into(),
        ));
    }

    let history = state
        .quote_provider
        .daily_history(&symbol, days)
        .await
        .map_err(|e| map_provider_error(&symbol, e))?;

    Ok(Json(StockHistory {
        symbol,
        days,
        history,
    }))
}
