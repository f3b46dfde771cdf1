use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{Asset, AssetWithPerformance, CreateAsset, PriceHistoryPoint, UpdateAsset};
use crate::services;
use crate::state::AppState;

// Nested under /api/portfolios alongside the portfolio routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/assets", post(create_asset).get(fetch_assets))
        .route("/:id/assets/:asset_id", get(get_asset))
        .route("/:id/assets/:asset_id", put(update_asset))
        .route("/:id/assets/:asset_id", delete(delete_asset))
        .route("/:id/assets/:asset_id/history", get(asset_price_history))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub days: Option<i64>,
}

pub async fn create_asset(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(portfolio_id): Path<Uuid>,
    Json(data): Json<CreateAsset>,
) -> Result<Json<Asset>, AppError> {
    info!("POST /api/portfolios/{}/assets - Adding asset", portfolio_id);
    let asset =
        services::asset_service::create(&state.pool, &state.quotes, user.id, portfolio_id, data)
            .await
            .map_err(|e| {
                error!("Failed to create asset in portfolio {}: {}", portfolio_id, e);
                e
            })?;
    Ok(Json(asset))
}

pub async fn fetch_assets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(portfolio_id): Path<Uuid>,
) -> Result<Json<Vec<Asset>>, AppError> {
    info!("GET /api/portfolios/{}/assets - Fetching assets", portfolio_id);
    let assets = services::asset_service::fetch_all(&state.pool, user.id, portfolio_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch assets for portfolio {}: {}", portfolio_id, e);
            e
        })?;
    Ok(Json(assets))
}

pub async fn get_asset(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((portfolio_id, asset_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AssetWithPerformance>, AppError> {
    info!(
        "GET /api/portfolios/{}/assets/{} - Fetching asset with performance",
        portfolio_id, asset_id
    );
    let asset = services::asset_service::get_with_performance(
        &state.pool,
        &state.quotes,
        user.id,
        portfolio_id,
        asset_id,
    )
    .await
    .map_err(|e| {
        error!("Failed to fetch asset {}: {}", asset_id, e);
        e
    })?;
    Ok(Json(asset))
}

pub async fn update_asset(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((portfolio_id, asset_id)): Path<(Uuid, Uuid)>,
    Json(data): Json<UpdateAsset>,
) -> Result<Json<Asset>, AppError> {
    info!(
        "PUT /api/portfolios/{}/assets/{} - Updating asset",
        portfolio_id, asset_id
    );
    let asset =
        services::asset_service::update(&state.pool, user.id, portfolio_id, asset_id, data)
            .await
            .map_err(|e| {
                error!("Failed to update asset {}: {}", asset_id, e);
                e
            })?;
    Ok(Json(asset))
}

pub async fn delete_asset(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((portfolio_id, asset_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    info!(
        "DELETE /api/portfolios/{}/assets/{} - Deleting asset",
        portfolio_id, asset_id
    );
    services::asset_service::delete(&state.pool, user.id, portfolio_id, asset_id)
        .await
        .map_err(|e| {
            error!("Failed to delete asset {}: {}", asset_id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn asset_price_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((portfolio_id, asset_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<PriceHistoryPoint>>, AppError> {
    let days = params.days.unwrap_or(30);
    info!(
        "GET /api/portfolios/{}/assets/{}/history - Last {} days",
        portfolio_id, asset_id, days
    );
    let points =
        services::asset_service::history_for(&state.pool, user.id, portfolio_id, asset_id, days)
            .await
            .map_err(|e| {
                error!("Failed to fetch price history for asset {}: {}", asset_id, e);
                e
            })?;
    Ok(Json(points))
}
