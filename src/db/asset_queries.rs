use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Asset, UpdateAsset};

pub async fn insert(pool: &PgPool, input: Asset) -> Result<Asset, sqlx::Error> {
    sqlx::query_as::<_, Asset>(
        "INSERT INTO assets (id, portfolio_id, symbol, quantity, purchase_price,
                             purchase_date, notes, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id, portfolio_id, symbol, quantity, purchase_price,
                   purchase_date, notes, created_at, updated_at",
    )
    .bind(input.id)
    .bind(input.portfolio_id)
    .bind(input.symbol)
    .bind(input.quantity)
    .bind(input.purchase_price)
    .bind(input.purchase_date)
    .bind(input.notes)
    .bind(input.created_at)
    .bind(input.updated_at)
    .fetch_one(pool)
    .await
}

// Insertion order: the assembled portfolio view relies on it.
pub async fn fetch_for_portfolio(
    pool: &PgPool,
    portfolio_id: Uuid,
) -> Result<Vec<Asset>, sqlx::Error> {
    sqlx::query_as::<_, Asset>(
        "SELECT id, portfolio_id, symbol, quantity, purchase_price,
                purchase_date, notes, created_at, updated_at
         FROM assets
         WHERE portfolio_id = $1
         ORDER BY created_at ASC",
    )
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(
    pool: &PgPool,
    id: Uuid,
    portfolio_id: Uuid,
) -> Result<Option<Asset>, sqlx::Error> {
    sqlx::query_as::<_, Asset>(
        "SELECT id, portfolio_id, symbol, quantity, purchase_price,
                purchase_date, notes, created_at, updated_at
         FROM assets
         WHERE id = $1 AND portfolio_id = $2",
    )
    .bind(id)
    .bind(portfolio_id)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    portfolio_id: Uuid,
    input: UpdateAsset,
) -> Result<Option<Asset>, sqlx::Error> {
    sqlx::query_as::<_, Asset>(
        "UPDATE assets
         SET symbol = COALESCE($1, symbol),
             quantity = COALESCE($2, quantity),
             purchase_price = COALESCE($3, purchase_price),
             purchase_date = COALESCE($4, purchase_date),
             notes = COALESCE($5, notes),
             updated_at = now()
         WHERE id = $6 AND portfolio_id = $7
         RETURNING id, portfolio_id, symbol, quantity, purchase_price,
                   purchase_date, notes, created_at, updated_at",
    )
    .bind(input.symbol)
    .bind(input.quantity)
    .bind(input.purchase_price)
    .bind(input.purchase_date)
    .bind(input.notes)
    .bind(id)
    .bind(portfolio_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, portfolio_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assets WHERE id = $1 AND portfolio_id = $2")
        .bind(id)
        .bind(portfolio_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
