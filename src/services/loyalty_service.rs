use crate::entities::{
    LoyaltyTransactionType, RewardType, customer_entity as customer,
    customer_point_entity as customer_point, loyalty_reward_entity as reward,
    loyalty_transaction_entity as loyalty_txn, menu_item_entity as menu_item,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

/// 加行锁读取会员在门店的积分余额
pub(crate) async fn lock_points<C: ConnectionTrait>(
    db: &C,
    outlet_id: Uuid,
    customer_id: Uuid,
) -> AppResult<Option<customer_point::Model>> {
    let row = customer_point::Entity::find()
        .filter(customer_point::Column::OutletId.eq(outlet_id))
        .filter(customer_point::Column::CustomerId.eq(customer_id))
        .lock_exclusive()
        .one(db)
        .await?;
    Ok(row)
}

/// 积分余额加减；余额行不存在时以 delta 创建
pub(crate) async fn add_points<C: ConnectionTrait>(
    db: &C,
    current: Option<customer_point::Model>,
    outlet_id: Uuid,
    customer_id: Uuid,
    delta: i64,
) -> AppResult<customer_point::Model> {
    let now = Utc::now();
    let row = match current {
        Some(row) => {
            let balance = row.total_points + delta;
            if balance < 0 {
                return Err(AppError::InsufficientPoints(format!(
                    "Customer {customer_id} has {} points",
                    row.total_points
                )));
            }
            let mut active = row.into_active_model();
            active.total_points = Set(balance);
            active.updated_at = Set(now);
            active.update(db).await?
        }
        None => {
            if delta < 0 {
                return Err(AppError::InsufficientPoints(format!(
                    "Customer {customer_id} has no points"
                )));
            }
            customer_point::ActiveModel {
                id: Set(Uuid::new_v4()),
                outlet_id: Set(outlet_id),
                customer_id: Set(customer_id),
                total_points: Set(delta),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(db)
            .await?
        }
    };
    Ok(row)
}

pub(crate) async fn log_points<C: ConnectionTrait>(
    db: &C,
    outlet_id: Uuid,
    customer_id: Uuid,
    order_id: Uuid,
    transaction_type: LoyaltyTransactionType,
    points: i64,
) -> AppResult<loyalty_txn::Model> {
    let (earned, redeemed) = match transaction_type {
        LoyaltyTransactionType::Earn => (points, 0),
        LoyaltyTransactionType::Redeem => (0, points),
    };
    let row = loyalty_txn::ActiveModel {
        id: Set(Uuid::new_v4()),
        outlet_id: Set(outlet_id),
        customer_id: Set(customer_id),
        order_id: Set(order_id),
        points_earned: Set(earned),
        points_redeemed: Set(redeemed),
        transaction_type: Set(transaction_type),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(row)
}

#[derive(Clone)]
pub struct LoyaltyService {
    pool: DatabaseConnection,
}

impl LoyaltyService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_reward(
        &self,
        ctx: &AuthContext,
        req: CreateRewardRequest,
    ) -> AppResult<RewardResponse> {
        ctx.require_manager()?;
        if req.name.trim().is_empty() {
            return Err(AppError::ValidationError("Reward name is required".to_string()));
        }
        if req.points_required <= 0 {
            return Err(AppError::ValidationError(
                "points_required must be positive".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        let (value, menu_id, quantity) = match req.reward_type {
            RewardType::Discount => {
                let value = req.value.unwrap_or(0);
                if value <= 0 {
                    return Err(AppError::ValidationError(
                        "Discount rewards need a positive value".to_string(),
                    ));
                }
                (value, None, 0)
            }
            RewardType::FreeItem => {
                let menu_id = req.menu_id.ok_or_else(|| {
                    AppError::ValidationError("Free item rewards need a menu_id".to_string())
                })?;
                menu_item::Entity::find_by_id(menu_id)
                    .filter(menu_item::Column::OutletId.eq(ctx.outlet_id))
                    .one(&txn)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?;
                let quantity = req.quantity.unwrap_or(1);
                if quantity <= 0 {
                    return Err(AppError::ValidationError(
                        "Free item quantity must be positive".to_string(),
                    ));
                }
                (0, Some(menu_id), quantity)
            }
        };

        let now = Utc::now();
        let created = reward::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(ctx.outlet_id),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            points_required: Set(req.points_required),
            reward_type: Set(req.reward_type),
            value: Set(value),
            menu_id: Set(menu_id),
            quantity: Set(quantity),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "loyalty_rewards",
            Some(created.id),
            format!("Created reward {}", created.name),
        )
        .await?;
        txn.commit().await?;
        Ok(created.into())
    }

    pub async fn list_rewards(&self, ctx: &AuthContext) -> AppResult<Vec<RewardResponse>> {
        let rows = reward::Entity::find()
            .filter(reward::Column::OutletId.eq(ctx.outlet_id))
            .order_by_asc(reward::Column::PointsRequired)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(RewardResponse::from).collect())
    }

    pub async fn get_reward(&self, ctx: &AuthContext, id: Uuid) -> AppResult<RewardResponse> {
        reward::Entity::find_by_id(id)
            .filter(reward::Column::OutletId.eq(ctx.outlet_id))
            .one(&self.pool)
            .await?
            .map(RewardResponse::from)
            .ok_or_else(|| AppError::NotFound("Reward not found".to_string()))
    }

    pub async fn update_reward(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        req: UpdateRewardRequest,
    ) -> AppResult<RewardResponse> {
        ctx.require_manager()?;
        let txn = self.pool.begin().await?;
        let existing = reward::Entity::find_by_id(id)
            .filter(reward::Column::OutletId.eq(ctx.outlet_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Reward not found".to_string()))?;

        let mut active = existing.into_active_model();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(description) = req.description {
            active.description = Set(Some(description));
        }
        if let Some(points) = req.points_required {
            if points <= 0 {
                return Err(AppError::ValidationError(
                    "points_required must be positive".to_string(),
                ));
            }
            active.points_required = Set(points);
        }
        if let Some(value) = req.value {
            active.value = Set(value.max(0));
        }
        if let Some(quantity) = req.quantity {
            active.quantity = Set(quantity.max(0));
        }
        if let Some(is_active) = req.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        record_activity(
            &txn,
            ctx.user_id,
            "update",
            "loyalty_rewards",
            Some(updated.id),
            format!("Updated reward {}", updated.name),
        )
        .await?;
        txn.commit().await?;
        Ok(updated.into())
    }

    pub async fn customer_transactions(
        &self,
        ctx: &AuthContext,
        customer_id: Uuid,
    ) -> AppResult<Vec<LoyaltyTransactionResponse>> {
        customer::Entity::find_by_id(customer_id)
            .filter(customer::Column::OutletId.eq(ctx.outlet_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

        let rows = loyalty_txn::Entity::find()
            .filter(loyalty_txn::Column::OutletId.eq(ctx.outlet_id))
            .filter(loyalty_txn::Column::CustomerId.eq(customer_id))
            .order_by_desc(loyalty_txn::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(LoyaltyTransactionResponse::from).collect())
    }
}
