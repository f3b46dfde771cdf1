use chrono::Utc;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{
    Asset, AssetWithPerformance, CreatePortfolio, Portfolio, PortfolioWithSummary, Quote,
    UpdatePortfolio,
};
use crate::services::quote_cache::QuoteCache;
use crate::services::{price_history_service, valuation};

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Portfolio name cannot be empty".into()));
    }
    if name.len() > 100 {
        return Err(AppError::Validation(
            "Portfolio name cannot exceed 100 characters".into(),
        ));
    }
    Ok(())
}

pub async fn create(
    pool: &PgPool,
    owner_id: Uuid,
    input: CreatePortfolio,
) -> Result<Portfolio, AppError> {
    validate_name(&input.name)?;
    let portfolio = Portfolio::new(owner_id, input.name, input.description);
    Ok(db::portfolio_queries::insert(pool, portfolio).await?)
}

pub async fn fetch_all(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Portfolio>, AppError> {
    Ok(db::portfolio_queries::fetch_for_owner(pool, owner_id).await?)
}

pub async fn fetch_one(pool: &PgPool, owner_id: Uuid, id: Uuid) -> Result<Portfolio, AppError> {
    db::portfolio_queries::fetch_one(pool, id, owner_id)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn update(
    pool: &PgPool,
    owner_id: Uuid,
    id: Uuid,
    input: UpdatePortfolio,
) -> Result<Portfolio, AppError> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    db::portfolio_queries::update(pool, id, owner_id, input)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn delete(pool: &PgPool, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
    match db::portfolio_queries::delete(pool, id, owner_id).await? {
        0 => Err(AppError::NotFound),
        _ => Ok(()),
    }
}

/// Assembles the externally-facing portfolio view: each asset enriched with
/// valuation figures, folded into one summary. One asset's quote failure
/// never aborts the rest — that asset degrades to the fallback valuation.
pub async fn get_with_summary(
    pool: &PgPool,
    quotes: &QuoteCache,
    owner_id: Uuid,
    id: Uuid,
) -> Result<PortfolioWithSummary, AppError> {
    let portfolio = db::portfolio_queries::fetch_one(pool, id, owner_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let assets = db::asset_queries::fetch_for_portfolio(pool, id).await?;

    // Fetch quotes in parallel; the cache collapses repeated symbols.
    let fetches: Vec<_> = assets
        .iter()
        .map(|asset| {
            let symbol = asset.symbol.clone();
            async move {
                match quotes.latest(&symbol).await {
                    Ok(quote) => Some(quote),
                    Err(e) => {
                        warn!("Quote fetch failed for {}: {}", symbol, e);
                        None
                    }
                }
            }
        })
        .collect();
    let fetched = futures::future::join_all(fetches).await;

    let mut priced = Vec::with_capacity(assets.len());
    for (asset, quote) in assets.into_iter().zip(fetched) {
        // History points are recorded only for successful fetches.
        if let Some(quote) = &quote {
            price_history_service::record(pool, asset.id, quote.price, Utc::now()).await;
        }
        priced.push((asset, quote));
    }

    Ok(build_with_summary(portfolio, priced))
}

/// Pure assembly step, separated so the fold semantics are testable without
/// a database: valuation per asset plus the summary, in insertion order.
pub fn build_with_summary(
    portfolio: Portfolio,
    priced: Vec<(Asset, Option<Quote>)>,
) -> PortfolioWithSummary {
    let mut assets = Vec::with_capacity(priced.len());
    let mut performances = Vec::with_capacity(priced.len());

    for (asset, quote) in priced {
        let performance = valuation::compute_asset_performance(&asset, quote.as_ref());
        assets.push(AssetWithPerformance::new(asset, &performance));
        performances.push(performance);
    }

    let summary = valuation::compute_portfolio_summary(&performances);
    PortfolioWithSummary {
        portfolio,
        assets,
        summary,
    }
}
