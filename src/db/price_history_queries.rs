use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::PriceHistoryPoint;

pub async fn insert(pool: &PgPool, input: PriceHistoryPoint) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO asset_price_history (id, asset_id, price, timestamp)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(input.id)
    .bind(input.asset_id)
    .bind(input.price)
    .bind(input.timestamp)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_since(
    pool: &PgPool,
    asset_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<PriceHistoryPoint>, sqlx::Error> {
    sqlx::query_as::<_, PriceHistoryPoint>(
        "SELECT id, asset_id, price, timestamp
         FROM asset_price_history
         WHERE asset_id = $1 AND timestamp >= $2
         ORDER BY timestamp ASC",
    )
    .bind(asset_id)
    .bind(since)
    .fetch_all(pool)
    .await
}
