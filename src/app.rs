use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{assets, auth, health, portfolios, sentiment, stocks};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/auth", auth::router())
        .nest("/api/portfolios", portfolios::router().merge(assets::router()))
        .nest("/api/stocks", stocks::router())
        .nest("/api/sentiment", sentiment::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
