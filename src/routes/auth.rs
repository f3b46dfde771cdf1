use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{CreateUser, LoginRequest, TokenResponse, User};
use crate::services::user_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(login))
        .route("/me", get(me))
}

pub async fn register(
    State(state): State<AppState>,
    Json(data): Json<CreateUser>,
) -> Result<Json<User>, AppError> {
    info!("POST /auth/register - Registering new user");
    let user = user_service::register(&state.pool, data).await.map_err(|e| {
        error!("Registration failed: {}", e);
        e
    })?;
    Ok(Json(user))
}

pub async fn login(
    State(state): State<AppState>,
    Json(data): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    info!("POST /auth/token - Issuing access token");
    let token = user_service::login(&state.pool, &state.auth, data)
        .await
        .map_err(|e| {
            error!("Login failed: {}", e);
            e
        })?;
    Ok(Json(token))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    info!("GET /auth/me - Returning current user {}", user.id);
    Json(user)
}
