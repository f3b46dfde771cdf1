use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{CreatePortfolio, Portfolio, PortfolioWithSummary, UpdatePortfolio};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_portfolio).get(fetch_portfolios))
        .route("/:id", get(get_portfolio))
        .route("/:id", put(update_portfolio))
        .route("/:id", delete(delete_portfolio))
}

#[axum::debug_handler]
pub async fn create_portfolio(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(data): Json<CreatePortfolio>,
) -> Result<Json<Portfolio>, AppError> {
    info!("POST /api/portfolios - Creating portfolio for user {}", user.id);
    let portfolio = services::portfolio_service::create(&state.pool, user.id, data)
        .await
        .map_err(|e| {
            error!("Failed to create portfolio: {}", e);
            e
        })?;
    Ok(Json(portfolio))
}

pub async fn fetch_portfolios(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Portfolio>>, AppError> {
    info!("GET /api/portfolios - Fetching portfolios for user {}", user.id);
    let portfolios = services::portfolio_service::fetch_all(&state.pool, user.id)
        .await
        .map_err(|e| {
            error!("Failed to fetch portfolios: {}", e);
            e
        })?;
    Ok(Json(portfolios))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PortfolioWithSummary>, AppError> {
    info!("GET /api/portfolios/{} - Fetching portfolio with summary", id);
    let portfolio =
        services::portfolio_service::get_with_summary(&state.pool, &state.quotes, user.id, id)
            .await
            .map_err(|e| {
                error!("Failed to fetch portfolio {}: {}", id, e);
                e
            })?;
    Ok(Json(portfolio))
}

pub async fn update_portfolio(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdatePortfolio>,
) -> Result<Json<Portfolio>, AppError> {
    info!("PUT /api/portfolios/{} - Updating portfolio", id);
    let portfolio = services::portfolio_service::update(&state.pool, user.id, id, data)
        .await
        .map_err(|e| {
            error!("Failed to update portfolio {}: {}", id, e);
            e
        })?;
    Ok(Json(portfolio))
}

pub async fn delete_portfolio(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/portfolios/{} - Deleting portfolio", id);
    services::portfolio_service::delete(&state.pool, user.id, id)
        .await
        .map_err(|e| {
            error!("Failed to delete portfolio {}: {}", id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
