use crate::entities::{
    OrderStatus, OrderType, order_entity, order_item_entity, order_tax_entity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub menu_id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub table_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub order_type: Option<OrderType>,
    pub notes: Option<String>,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order_id: Uuid,
    pub reference_number: String,
    pub subtotal: i64,
    pub tax_amount: i64,
    pub total_amount: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CancelOrderRequest {
    pub notes: Option<String>,
    /// 收银员需重新输入登录密码
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub status: Option<OrderStatus>,
    pub reference_number: Option<String>,
    pub customer_id: Option<Uuid>,
    pub table_id: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub reference_number: String,
    pub table_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub subtotal: i64,
    pub discount_id: Option<Uuid>,
    pub discount_amount: i64,
    pub tax_amount: i64,
    pub total_amount: i64,
    pub paid_amount: i64,
    pub change_amount: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<order_entity::Model> for OrderResponse {
    fn from(m: order_entity::Model) -> Self {
        Self {
            id: m.id,
            reference_number: m.reference_number,
            table_id: m.table_id,
            customer_id: m.customer_id,
            user_id: m.user_id,
            status: m.status,
            order_type: m.order_type,
            subtotal: m.subtotal,
            discount_id: m.discount_id,
            discount_amount: m.discount_amount,
            tax_amount: m.tax_amount,
            total_amount: m.total_amount,
            paid_amount: m.paid_amount,
            change_amount: m.change_amount,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub quantity: i32,
    pub price: i64,
    pub notes: Option<String>,
}

impl From<order_item_entity::Model> for OrderItemResponse {
    fn from(m: order_item_entity::Model) -> Self {
        Self {
            id: m.id,
            menu_id: m.menu_id,
            quantity: m.quantity,
            price: m.price,
            notes: m.notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderTaxResponse {
    pub tax_id: Uuid,
    pub rate_bp: i32,
    pub tax_amount: i64,
}

impl From<order_tax_entity::Model> for OrderTaxResponse {
    fn from(m: order_tax_entity::Model) -> Self {
        Self {
            tax_id: m.tax_id,
            rate_bp: m.rate_bp,
            tax_amount: m.tax_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
    pub taxes: Vec<OrderTaxResponse>,
}
