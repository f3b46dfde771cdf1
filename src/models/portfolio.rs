use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::AssetWithPerformance;

// A named grouping of asset holdings belonging to one user.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Portfolio {
    pub id: uuid::Uuid,
    pub owner_id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePortfolio {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePortfolio {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Aggregate P&L figures folded from the per-asset performances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit_loss: f64,
    pub total_profit_loss_percent: f64,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct PortfolioWithSummary {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    pub assets: Vec<AssetWithPerformance>,
    pub summary: PortfolioSummary,
}

impl Portfolio {
    pub fn new(owner_id: uuid::Uuid, name: String, description: Option<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            owner_id,
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}
