use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::PriceHistoryPoint;

/// Appends one immutable price observation. Recording is best-effort: a
/// write failure is logged and never aborts the valuation that produced it.
pub async fn record(pool: &PgPool, asset_id: Uuid, price: f64, timestamp: DateTime<Utc>) {
    let point = PriceHistoryPoint::new(asset_id, price, timestamp);
    if let Err(e) = db::price_history_queries::insert(pool, point).await {
        error!("Failed to record price history for asset {}: {}", asset_id, e);
    }
}

pub async fn history_for(
    pool: &PgPool,
    asset_id: Uuid,
    days: i64,
) -> Result<Vec<PriceHistoryPoint>, AppError> {
    let since = Utc::now() - Duration::days(days);
    let points = db::price_history_queries::fetch_since(pool, asset_id, since).await?;
    Ok(points)
}
