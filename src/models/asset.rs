use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// A holding: a position in one symbol with its cost basis.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: uuid::Uuid,
    pub portfolio_id: uuid::Uuid,
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: chrono::DateTime<chrono::Utc>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAsset {
    pub symbol: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: chrono::DateTime<chrono::Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateAsset {
    pub symbol: Option<String>,
    pub quantity: Option<f64>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<chrono::DateTime<chrono::Utc>>,
    pub notes: Option<String>,
}

/// Derived valuation figures for one holding. Recomputed on every read,
/// never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPerformance {
    pub current_price: f64,
    pub current_value: f64,
    pub cost: f64,
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct AssetWithPerformance {
    #[serde(flatten)]
    pub asset: Asset,
    pub current_price: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl Asset {
    pub fn new(
        portfolio_id: uuid::Uuid,
        symbol: String,
        quantity: f64,
        purchase_price: f64,
        purchase_date: chrono::DateTime<chrono::Utc>,
        notes: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            portfolio_id,
            symbol,
            quantity,
            purchase_price,
            purchase_date,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}

impl AssetWithPerformance {
    pub fn new(asset: Asset, performance: &AssetPerformance) -> Self {
        Self {
            asset,
            current_price: performance.current_price,
            current_value: performance.current_value,
            profit_loss: performance.profit_loss,
            profit_loss_percent: performance.profit_loss_percent,
            last_updated: chrono::Utc::now(),
        }
    }
}
