use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Portfolio, UpdatePortfolio};

pub async fn insert(pool: &PgPool, input: Portfolio) -> Result<Portfolio, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(
        "INSERT INTO portfolios (id, owner_id, name, description, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, owner_id, name, description, created_at, updated_at",
    )
    .bind(input.id)
    .bind(input.owner_id)
    .bind(input.name)
    .bind(input.description)
    .bind(input.created_at)
    .bind(input.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(
        "SELECT id, owner_id, name, description, created_at, updated_at
         FROM portfolios
         WHERE owner_id = $1
         ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(
        "SELECT id, owner_id, name, description, created_at, updated_at
         FROM portfolios
         WHERE id = $1 AND owner_id = $2",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    input: UpdatePortfolio,
) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(
        "UPDATE portfolios
         SET name = COALESCE($1, name),
             description = COALESCE($2, description),
             updated_at = now()
         WHERE id = $3 AND owner_id = $4
         RETURNING id, owner_id, name, description, created_at, updated_at",
    )
    .bind(input.name)
    .bind(input.description)
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolios WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
