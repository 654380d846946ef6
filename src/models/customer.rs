use crate::entities::{
    DiscountType, LoyaltyTransactionType, MembershipStatus, RewardType, customer_entity,
    discount_entity, loyalty_reward_entity, loyalty_transaction_entity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    #[schema(example = "Budi")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub membership_status: Option<MembershipStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub membership_status: Option<MembershipStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// 按姓名、电话或会员号模糊搜索
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub membership_number: String,
    pub membership_status: MembershipStatus,
    pub membership_start_date: DateTime<Utc>,
    pub total_points: i64,
}

impl CustomerResponse {
    pub fn new(m: customer_entity::Model, total_points: i64) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            address: m.address,
            membership_number: m.membership_number,
            membership_status: m.membership_status,
            membership_start_date: m.membership_start_date,
            total_points,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateDiscountRequest {
    #[schema(example = "Weekday 10%")]
    pub name: String,
    pub discount_type: DiscountType,
    /// percentage: 基点; fixed: 分
    #[schema(example = 1000)]
    pub value: i64,
    pub is_member_only: Option<bool>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiscountResponse {
    pub id: Uuid,
    pub name: String,
    pub discount_type: DiscountType,
    pub value: i64,
    pub is_member_only: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<discount_entity::Model> for DiscountResponse {
    fn from(m: discount_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            discount_type: m.discount_type,
            value: m.value,
            is_member_only: m.is_member_only,
            start_date: m.start_date,
            end_date: m.end_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRewardRequest {
    #[schema(example = "Free Latte")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 100)]
    pub points_required: i64,
    pub reward_type: RewardType,
    /// discount 类奖励的减免金额(分)
    pub value: Option<i64>,
    /// free_item 类奖励的菜品与数量
    pub menu_id: Option<Uuid>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRewardRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub points_required: Option<i64>,
    pub value: Option<i64>,
    pub quantity: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RewardResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub points_required: i64,
    pub reward_type: RewardType,
    pub value: i64,
    pub menu_id: Option<Uuid>,
    pub quantity: i32,
    pub is_active: bool,
}

impl From<loyalty_reward_entity::Model> for RewardResponse {
    fn from(m: loyalty_reward_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            points_required: m.points_required,
            reward_type: m.reward_type,
            value: m.value,
            menu_id: m.menu_id,
            quantity: m.quantity,
            is_active: m.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoyaltyTransactionResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub points_earned: i64,
    pub points_redeemed: i64,
    pub transaction_type: LoyaltyTransactionType,
    pub created_at: DateTime<Utc>,
}

impl From<loyalty_transaction_entity::Model> for LoyaltyTransactionResponse {
    fn from(m: loyalty_transaction_entity::Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            points_earned: m.points_earned,
            points_redeemed: m.points_redeemed,
            transaction_type: m.transaction_type,
            created_at: m.created_at,
        }
    }
}
