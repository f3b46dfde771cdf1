use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{SentimentTrend, SymbolSentiment, TextAnalysis, TextInput};
use crate::services::sentiment_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze_text))
        .route("/analyze-posts", post(analyze_posts))
        .route("/history/:symbol", get(sentiment_history))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzePostsParams {
    pub symbol: String,
    pub count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TrendParams {
    pub days: Option<i64>,
}

pub async fn analyze_text(
    State(state): State<AppState>,
    Json(input): Json<TextInput>,
) -> Result<Json<TextAnalysis>, AppError> {
    info!("POST /api/sentiment/analyze - Analyzing text");
    let analysis = sentiment_service::analyze_text(&state.pool, &state.classifier, &input.text)
        .await
        .map_err(|e| {
            error!("Text analysis failed: {}", e);
            e
        })?;
    Ok(Json(analysis))
}

pub async fn analyze_posts(
    State(state): State<AppState>,
    Query(params): Query<AnalyzePostsParams>,
) -> Result<Json<SymbolSentiment>, AppError> {
    let count = params.count.unwrap_or(10);
    info!(
        "POST /api/sentiment/analyze-posts - {} posts for {}",
        count, params.symbol
    );
    let result = sentiment_service::analyze_symbol_posts(
        &state.pool,
        &state.classifier,
        state.posts.as_ref(),
        &params.symbol,
        count,
    )
    .await
    .map_err(|e| {
        error!("Post analysis failed for {}: {}", params.symbol, e);
        e
    })?;
    Ok(Json(result))
}

pub async fn sentiment_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<TrendParams>,
) -> Result<Json<SentimentTrend>, AppError> {
    let days = params.days.unwrap_or(7);
    info!("GET /api/sentiment/history/{} - Last {} days", symbol, days);
    let trend = sentiment_service::trend(&state.pool, &symbol, days)
        .await
        .map_err(|e| {
            error!("Trend fetch failed for {}: {}", symbol, e);
            e
        })?;
    Ok(Json(trend))
}
