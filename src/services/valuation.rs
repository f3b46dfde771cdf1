use chrono::Utc;

use crate::models::{Asset, AssetPerformance, PortfolioSummary, Quote};

/// Derives the P&L figures for one holding. When no quote is available the
/// holding is valued at its purchase price, so an unreachable price source
/// degrades to zero profit/loss instead of failing the read.
pub fn compute_asset_performance(asset: &Asset, quote: Option<&Quote>) -> AssetPerformance {
    let cost = asset.quantity * asset.purchase_price;

    match quote {
        Some(quote) => {
            let current_value = asset.quantity * quote.price;
            let profit_loss = current_value - cost;
            let profit_loss_percent = if cost > 0.0 {
                profit_loss / cost * 100.0
            } else {
                0.0
            };
            AssetPerformance {
                current_price: quote.price,
                current_value,
                cost,
                profit_loss,
                profit_loss_percent,
            }
        }
        None => AssetPerformance {
            current_price: asset.purchase_price,
            current_value: cost,
            cost,
            profit_loss: 0.0,
            profit_loss_percent: 0.0,
        },
    }
}

/// Folds per-asset figures into portfolio totals, with the same zero-cost
/// guard on the aggregate percentage.
pub fn compute_portfolio_summary(performances: &[AssetPerformance]) -> PortfolioSummary {
    let total_cost: f64 = performances.iter().map(|p| p.cost).sum();
    let total_value: f64 = performances.iter().map(|p| p.current_value).sum();
    let total_profit_loss = total_value - total_cost;
    let total_profit_loss_percent = if total_cost > 0.0 {
        total_profit_loss / total_cost * 100.0
    } else {
        0.0
    };

    PortfolioSummary {
        total_value,
        total_cost,
        total_profit_loss,
        total_profit_loss_percent,
        last_updated: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn holding(quantity: f64, purchase_price: f64) -> Asset {
        Asset::new(
            Uuid::new_v4(),
            "AAPL".to_string(),
            quantity,
            purchase_price,
            Utc::now(),
            None,
        )
    }

    fn quote(price: f64) -> Quote {
        Quote {
            symbol: "AAPL".to_string(),
            price,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_performance_with_quote() {
        let asset = holding(10.0, 100.0);
        let perf = compute_asset_performance(&asset, Some(&quote(120.0)));

        assert!((perf.current_value - 1200.0).abs() < 1e-9);
        assert!((perf.cost - 1000.0).abs() < 1e-9);
        assert!((perf.profit_loss - 200.0).abs() < 1e-9);
        assert!((perf.profit_loss_percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_quote_falls_back_to_purchase_price() {
        let asset = holding(10.0, 100.0);
        let perf = compute_asset_performance(&asset, None);

        assert_eq!(perf.current_price, 100.0);
        assert!((perf.current_value - perf.cost).abs() < 1e-9);
        assert_eq!(perf.profit_loss, 0.0);
        assert_eq!(perf.profit_loss_percent, 0.0);
    }

    #[test]
    fn test_zero_cost_yields_zero_percent() {
        let asset = holding(10.0, 0.0);
        let perf = compute_asset_performance(&asset, Some(&quote(50.0)));

        assert_eq!(perf.cost, 0.0);
        assert_eq!(perf.profit_loss_percent, 0.0);
        assert!(perf.profit_loss_percent.is_finite());
    }

    #[test]
    fn test_summary_is_the_fold_of_asset_figures() {
        let performances = vec![
            compute_asset_performance(&holding(10.0, 100.0), Some(&quote(120.0))),
            compute_asset_performance(&holding(5.0, 40.0), Some(&quote(30.0))),
            compute_asset_performance(&holding(2.0, 10.0), None),
        ];
        let summary = compute_portfolio_summary(&performances);

        let expected_cost: f64 = performances.iter().map(|p| p.cost).sum();
        let expected_value: f64 = performances.iter().map(|p| p.current_value).sum();

        assert!((summary.total_cost - expected_cost).abs() < 1e-9);
        assert!((summary.total_value - expected_value).abs() < 1e-9);
        assert!((summary.total_profit_loss - (expected_value - expected_cost)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary_is_all_zeros() {
        let summary = compute_portfolio_summary(&[]);

        assert_eq!(summary.total_cost, 0.0);
        assert_eq!(summary.total_value, 0.0);
        assert_eq!(summary.total_profit_loss, 0.0);
        assert_eq!(summary.total_profit_loss_percent, 0.0);
    }
}
