use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::SentimentResult;

pub async fn insert(pool: &PgPool, input: SentimentResult) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO sentiment_results (id, symbol, sentiment, confidence, source_text, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(input.id)
    .bind(input.symbol)
    .bind(input.sentiment)
    .bind(input.confidence)
    .bind(input.source_text)
    .bind(input.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_since(
    pool: &PgPool,
    symbol: &str,
    since: DateTime<Utc>,
) -> Result<Vec<SentimentResult>, sqlx::Error> {
    sqlx::query_as::<_, SentimentResult>(
        "SELECT id, symbol, sentiment, confidence, source_text, created_at
         FROM sentiment_results
         WHERE symbol = $1 AND created_at >= $2
         ORDER BY created_at ASC",
    )
    .bind(symbol)
    .bind(since)
    .fetch_all(pool)
    .await
}
