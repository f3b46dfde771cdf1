use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// One immutable price observation for an asset. Append-only; rows go away
// only when the owning asset is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceHistoryPoint {
    pub id: uuid::Uuid,
    pub asset_id: uuid::Uuid,
    pub price: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl PriceHistoryPoint {
    pub fn new(asset_id: uuid::Uuid, price: f64, timestamp: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            asset_id,
            price,
            timestamp,
        }
    }
}
