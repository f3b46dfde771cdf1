use chrono::Utc;
use regex::Regex;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{Asset, AssetWithPerformance, CreateAsset, PriceHistoryPoint, UpdateAsset};
use crate::services::quote_cache::QuoteCache;
use crate::services::{price_history_service, valuation};

/// Uppercases and validates a ticker symbol. Quote cache keys, stored asset
/// rows and sentiment rows all share this normal form.
pub fn normalize_symbol(raw: &str) -> Result<String, AppError> {
    let symbol = raw.trim().to_uppercase();
    let pattern = Regex::new(r"^[A-Z0-9.]{1,20}$").unwrap();
    if !pattern.is_match(&symbol) {
        return Err(AppError::Validation(format!(
            "Invalid stock symbol: {}",
            raw
        )));
    }
    Ok(symbol)
}

// Foreign portfolios look like missing ones so ids don't leak.
async fn ensure_owned(pool: &PgPool, owner_id: Uuid, portfolio_id: Uuid) -> Result<(), AppError> {
    db::portfolio_queries::fetch_one(pool, portfolio_id, owner_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(())
}

fn validate_position(quantity: Option<f64>, purchase_price: Option<f64>) -> Result<(), AppError> {
    if matches!(quantity, Some(q) if q <= 0.0) {
        return Err(AppError::Validation("Quantity must be positive".into()));
    }
    if matches!(purchase_price, Some(p) if p <= 0.0) {
        return Err(AppError::Validation(
            "Purchase price must be positive".into(),
        ));
    }
    Ok(())
}

pub async fn create(
    pool: &PgPool,
    quotes: &QuoteCache,
    owner_id: Uuid,
    portfolio_id: Uuid,
    input: CreateAsset,
) -> Result<Asset, AppError> {
    ensure_owned(pool, owner_id, portfolio_id).await?;
    let symbol = normalize_symbol(&input.symbol)?;
    validate_position(Some(input.quantity), Some(input.purchase_price))?;

    let asset = db::asset_queries::insert(
        pool,
        Asset::new(
            portfolio_id,
            symbol,
            input.quantity,
            input.purchase_price,
            input.purchase_date,
            input.notes,
        ),
    )
    .await?;

    // Seed the price history so a brand-new asset has a baseline observation.
    match quotes.latest(&asset.symbol).await {
        Ok(quote) => price_history_service::record(pool, asset.id, quote.price, Utc::now()).await,
        Err(e) => warn!("Could not fetch initial price for {}: {}", asset.symbol, e),
    }

    Ok(asset)
}

pub async fn fetch_all(
    pool: &PgPool,
    owner_id: Uuid,
    portfolio_id: Uuid,
) -> Result<Vec<Asset>, AppError> {
    ensure_owned(pool, owner_id, portfolio_id).await?;
    Ok(db::asset_queries::fetch_for_portfolio(pool, portfolio_id).await?)
}

/// Single-asset detail: valuation against the freshest quote the cache can
/// give, degrading to the purchase price when no quote is reachable.
pub async fn get_with_performance(
    pool: &PgPool,
    quotes: &QuoteCache,
    owner_id: Uuid,
    portfolio_id: Uuid,
    asset_id: Uuid,
) -> Result<AssetWithPerformance, AppError> {
    ensure_owned(pool, owner_id, portfolio_id).await?;
    let asset = db::asset_queries::fetch_one(pool, asset_id, portfolio_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let quote = match quotes.latest(&asset.symbol).await {
        Ok(quote) => Some(quote),
        Err(e) => {
            warn!("Quote fetch failed for {}: {}", asset.symbol, e);
            None
        }
    };
    if let Some(quote) = &quote {
        price_history_service::record(pool, asset.id, quote.price, Utc::now()).await;
    }

    let performance = valuation::compute_asset_performance(&asset, quote.as_ref());
    Ok(AssetWithPerformance::new(asset, &performance))
}

pub async fn update(
    pool: &PgPool,
    owner_id: Uuid,
    portfolio_id: Uuid,
    asset_id: Uuid,
    mut input: UpdateAsset,
) -> Result<Asset, AppError> {
    ensure_owned(pool, owner_id, portfolio_id).await?;
    if let Some(symbol) = &input.symbol {
        input.symbol = Some(normalize_symbol(symbol)?);
    }
    validate_position(input.quantity, input.purchase_price)?;
    db::asset_queries::update(pool, asset_id, portfolio_id, input)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn delete(
    pool: &PgPool,
    owner_id: Uuid,
    portfolio_id: Uuid,
    asset_id: Uuid,
) -> Result<(), AppError> {
    ensure_owned(pool, owner_id, portfolio_id).await?;
    match db::asset_queries::delete(pool, asset_id, portfolio_id).await? {
        0 => Err(AppError::NotFound),
        _ => Ok(()),
    }
}

pub async fn history_for(
    pool: &PgPool,
    owner_id: Uuid,
    portfolio_id: Uuid,
    asset_id: Uuid,
    days: i64,
) -> Result<Vec<PriceHistoryPoint>, AppError> {
    if !(1..=365).contains(&days) {
        return Err(AppError::Validation(
            "days must be between 1 and 365".into(),
        ));
    }
    ensure_owned(pool, owner_id, portfolio_id).await?;
    db::asset_queries::fetch_one(pool, asset_id, portfolio_id)
        .await?
        .ok_or(AppError::NotFound)?;
    price_history_service::history_for(pool, asset_id, days).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol_uppercases_and_trims() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("brk.b").unwrap(), "BRK.B");
    }

    #[test]
    fn test_normalize_symbol_rejects_bad_input() {
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("   ").is_err());
        assert!(normalize_symbol("AA PL").is_err());
        assert!(normalize_symbol("TOO$LONG").is_err());
        assert!(normalize_symbol("ABCDEFGHIJKLMNOPQRSTU").is_err());
    }

    #[test]
    fn test_position_validation() {
        assert!(validate_position(Some(1.0), Some(10.0)).is_ok());
        assert!(validate_position(None, None).is_ok());
        assert!(validate_position(Some(0.0), Some(10.0)).is_err());
        assert!(validate_position(Some(1.0), Some(-2.0)).is_err());
    }
}
