use crate::entities::{
    PaymentMethod, PaymentStatus, RefundStatus, SplitStatus, payment_entity,
    payment_split_entity, refund_entity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentSplitRequest {
    pub payment_method: PaymentMethod,
    #[schema(example = 5000)]
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayOrderRequest {
    /// 实收金额(分)
    #[schema(example = 11500)]
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub splits: Option<Vec<PaymentSplitRequest>>,
    pub redeem_reward_id: Option<Uuid>,
    pub discount_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResultResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub reference_number: String,
    pub final_amount: i64,
    pub discount_amount: i64,
    pub reward_amount: i64,
    pub paid_amount: i64,
    pub change_amount: i64,
    pub points_earned: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefundRequest {
    pub payment_id: Uuid,
    #[schema(example = "Customer complaint")]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefundResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub payment_id: Uuid,
    pub amount: i64,
    pub reason: String,
    pub status: RefundStatus,
    pub processed_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<refund_entity::Model> for RefundResponse {
    fn from(m: refund_entity::Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            payment_id: m.payment_id,
            amount: m.amount,
            reason: m.reason,
            status: m.status,
            processed_by: m.processed_by,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub payment_status: Option<PaymentStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub reference_number: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub user_id: Uuid,
    pub notes: Option<String>,
}

impl From<payment_entity::Model> for PaymentResponse {
    fn from(m: payment_entity::Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            amount: m.amount,
            payment_method: m.payment_method,
            payment_status: m.payment_status,
            reference_number: m.reference_number,
            payment_date: m.payment_date,
            user_id: m.user_id,
            notes: m.notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentSplitResponse {
    pub id: Uuid,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub status: SplitStatus,
    pub reference_number: Option<String>,
}

impl From<payment_split_entity::Model> for PaymentSplitResponse {
    fn from(m: payment_split_entity::Model) -> Self {
        Self {
            id: m.id,
            amount: m.amount,
            payment_method: m.payment_method,
            status: m.status,
            reference_number: m.reference_number,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentDetailResponse {
    #[serde(flatten)]
    pub payment: PaymentResponse,
    pub splits: Vec<PaymentSplitResponse>,
}
