use crate::entities::{InventoryTransactionType, inventory_transaction_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryTransactionRequest {
    pub ingredient_id: Uuid,
    pub transaction_type: InventoryTransactionType,
    /// add/remove 为变化量，adjust 为调整后的绝对库存
    #[schema(example = 1000)]
    pub quantity: i32,
    #[schema(example = "Weekly delivery")]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventorySnapshot {
    pub ingredient_id: Uuid,
    pub quantity: i32,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryTransactionResponse {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub transaction_type: InventoryTransactionType,
    pub quantity: i32,
    pub reason: String,
    pub order_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<inventory_transaction_entity::Model> for InventoryTransactionResponse {
    fn from(m: inventory_transaction_entity::Model) -> Self {
        Self {
            id: m.id,
            ingredient_id: m.ingredient_id,
            transaction_type: m.transaction_type,
            quantity: m.quantity,
            reason: m.reason,
            order_id: m.order_id,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryTransactionResult {
    pub transaction: InventoryTransactionResponse,
    pub inventory: InventorySnapshot,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InventoryTransactionQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub ingredient_id: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LowStockItem {
    pub ingredient_id: Uuid,
    pub name: String,
    pub unit: String,
    pub quantity: i32,
    pub minimum_stock: i32,
}
