use crate::config::LoyaltyConfig;
use crate::entities::{
    LoyaltyTransactionType, OrderStatus, PaymentMethod, PaymentStatus, RefundStatus,
    RewardType, SplitStatus, TableStatus, customer_entity as customer,
    discount_entity as discount, loyalty_reward_entity as reward, order_entity as order,
    order_item_entity as order_item, payment_entity as payment,
    payment_split_entity as payment_split, refund_entity as refund,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::services::loyalty_service::{add_points, lock_points, log_points};
use crate::services::order_service::set_table_status;
use crate::services::settlement::{
    self, RewardEffect, RewardOutcome, discount_amount, earned_points, has_enough_points,
    reward_outcome,
};
use crate::utils::{date_bounds, format_cents, payment_reference, split_reference, validate_amount};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
    loyalty: LoyaltyConfig,
}

impl PaymentService {
    pub fn new(pool: DatabaseConnection, loyalty: LoyaltyConfig) -> Self {
        Self { pool, loyalty }
    }

    /// 结账：积分兑换、折扣、积分累计、支付记录、分账和桌台释放在同一事务内完成
    pub async fn pay_order(
        &self,
        ctx: &AuthContext,
        order_id: Uuid,
        req: PayOrderRequest,
    ) -> AppResult<PaymentResultResponse> {
        validate_amount(req.amount, "amount")?;
        let splits = settlement::resolve_splits(req.amount, req.payment_method, req.splits.as_deref())?;
        if req.redeem_reward_id.is_some() && req.customer_id.is_none() {
            return Err(AppError::ValidationError(
                "customer_id is required to redeem a reward".to_string(),
            ));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let existing = order::Entity::find_by_id(order_id)
            .filter(order::Column::OutletId.eq(ctx.outlet_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        if existing.status != OrderStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Order {} is not pending (status {})",
                existing.reference_number, existing.status
            )));
        }

        let customer_id = req.customer_id.or(existing.customer_id);
        if let Some(customer_id) = customer_id {
            customer::Entity::find_by_id(customer_id)
                .filter(customer::Column::OutletId.eq(ctx.outlet_id))
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;
        }

        // 兑换奖励：先校验，写入放在实收校验之后
        let mut redemption = None;
        let mut reward_result = RewardOutcome::default();
        if let (Some(reward_id), Some(customer_id)) = (req.redeem_reward_id, req.customer_id) {
            let rw = reward::Entity::find_by_id(reward_id)
                .filter(reward::Column::OutletId.eq(ctx.outlet_id))
                .filter(reward::Column::IsActive.eq(true))
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Reward not found or inactive".to_string()))?;
            let points = lock_points(&txn, ctx.outlet_id, customer_id).await?;
            let balance = points.as_ref().map_or(0, |p| p.total_points);
            if !has_enough_points(balance, rw.points_required) {
                return Err(AppError::InsufficientPoints(format!(
                    "Reward {} needs more than {} points, customer has {}",
                    rw.name, rw.points_required, balance
                )));
            }

            let mut free_line = None;
            let effect = match rw.reward_type {
                RewardType::FreeItem => {
                    let menu_id = rw.menu_id.ok_or_else(|| {
                        AppError::ValidationError(format!("Reward {} has no menu item", rw.name))
                    })?;
                    let line = order_item::Entity::find()
                        .filter(order_item::Column::OrderId.eq(order_id))
                        .filter(order_item::Column::MenuId.eq(menu_id))
                        .one(&txn)
                        .await?
                        .ok_or_else(|| {
                            AppError::ValidationError(format!(
                                "Order does not contain the free item of reward {}",
                                rw.name
                            ))
                        })?;
                    let effect = RewardEffect::FreeItem {
                        unit_price: line.price,
                        ordered_quantity: line.quantity,
                        reward_quantity: rw.quantity,
                    };
                    free_line = Some(line);
                    effect
                }
                RewardType::Discount => RewardEffect::FlatDiscount(rw.value),
            };
            reward_result = reward_outcome(effect);
            redemption = Some((rw, points, free_line, customer_id));
        }

        let mut applied_discount = 0;
        if let Some(discount_id) = req.discount_id {
            let d = discount::Entity::find_by_id(discount_id)
                .filter(discount::Column::OutletId.eq(ctx.outlet_id))
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Discount not found".to_string()))?;
            if !d.is_valid_at(now) {
                return Err(AppError::ValidationError(format!(
                    "Discount {} is not active",
                    d.name
                )));
            }
            if d.is_member_only && customer_id.is_none() {
                return Err(AppError::ValidationError(format!(
                    "Discount {} is for members only",
                    d.name
                )));
            }
            applied_discount = discount_amount(d.discount_type, d.value, existing.subtotal);
        }

        let settled = settlement::settle(
            existing.total_amount,
            reward_result.amount,
            applied_discount,
            req.amount,
        )?;

        if let Some((rw, points, free_line, customer_id)) = redemption {
            add_points(&txn, points, ctx.outlet_id, customer_id, -rw.points_required).await?;
            log_points(
                &txn,
                ctx.outlet_id,
                customer_id,
                order_id,
                LoyaltyTransactionType::Redeem,
                rw.points_required,
            )
            .await?;
            if let Some(line) = free_line {
                let remaining = (line.quantity - reward_result.freed_quantity).max(0);
                let mut active = line.into_active_model();
                active.quantity = Set(remaining);
                active.update(&txn).await?;
            }
        }

        let mut points_earned = 0;
        if let Some(customer_id) = customer_id {
            points_earned = earned_points(existing.total_amount, self.loyalty.earn_unit);
            let current = lock_points(&txn, ctx.outlet_id, customer_id).await?;
            add_points(&txn, current, ctx.outlet_id, customer_id, points_earned).await?;
            log_points(
                &txn,
                ctx.outlet_id,
                customer_id,
                order_id,
                LoyaltyTransactionType::Earn,
                points_earned,
            )
            .await?;
        }

        let reference_number = payment_reference(&req.payment_method.to_string(), now);
        let payment_id = Uuid::new_v4();
        payment::ActiveModel {
            id: Set(payment_id),
            outlet_id: Set(ctx.outlet_id),
            order_id: Set(order_id),
            amount: Set(req.amount),
            payment_method: Set(req.payment_method),
            payment_status: Set(PaymentStatus::Completed),
            reference_number: Set(Some(reference_number.clone())),
            payment_date: Set(now),
            user_id: Set(ctx.user_id),
            notes: Set(req.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        for (method, amount) in &splits {
            payment_split::ActiveModel {
                id: Set(Uuid::new_v4()),
                payment_id: Set(payment_id),
                amount: Set(*amount),
                payment_method: Set(*method),
                status: Set(SplitStatus::Completed),
                reference_number: Set(Some(split_reference(now))),
                user_id: Set(ctx.user_id),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        let table_id = existing.table_id;
        let order_reference = existing.reference_number.clone();
        let mut active = existing.into_active_model();
        active.status = Set(OrderStatus::Completed);
        active.paid_amount = Set(req.amount);
        active.change_amount = Set(settled.change_amount);
        active.discount_id = Set(req.discount_id);
        active.discount_amount = Set(applied_discount);
        active.customer_id = Set(customer_id);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        if let Some(table_id) = table_id {
            set_table_status(&txn, table_id, TableStatus::Available).await?;
        }

        record_activity(
            &txn,
            ctx.user_id,
            "pay",
            "payments",
            Some(payment_id),
            format!(
                "Paid order {order_reference}: final {} tendered {} change {}",
                format_cents(settled.final_amount),
                format_cents(req.amount),
                format_cents(settled.change_amount)
            ),
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "Payment settled: order={} ref={} method={} final={} change={}",
            order_reference,
            reference_number,
            req.payment_method,
            settled.final_amount,
            settled.change_amount
        );

        Ok(PaymentResultResponse {
            id: payment_id,
            order_id,
            reference_number,
            final_amount: settled.final_amount,
            discount_amount: applied_discount,
            reward_amount: reward_result.amount,
            paid_amount: req.amount,
            change_amount: settled.change_amount,
            points_earned,
        })
    }

    /// 全额退款：退款金额为订单总额，订单状态保持 completed
    pub async fn refund_payment(
        &self,
        ctx: &AuthContext,
        order_id: Uuid,
        req: RefundRequest,
    ) -> AppResult<RefundResponse> {
        ctx.require_manager()?;
        let reason = req.reason.trim().to_string();
        if reason.is_empty() {
            return Err(AppError::ValidationError("Refund reason is required".to_string()));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let existing = order::Entity::find_by_id(order_id)
            .filter(order::Column::OutletId.eq(ctx.outlet_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        let paid = payment::Entity::find_by_id(req.payment_id)
            .filter(payment::Column::OrderId.eq(order_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found for this order".to_string()))?;

        if paid.payment_status == PaymentStatus::Refunded {
            return Err(AppError::Conflict(format!(
                "Payment for order {} is already refunded",
                existing.reference_number
            )));
        }
        let amount = existing.total_amount;
        if amount > paid.amount {
            return Err(AppError::ValidationError(format!(
                "Refund amount {} exceeds payment amount {}",
                format_cents(amount),
                format_cents(paid.amount)
            )));
        }

        let created = refund::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            payment_id: Set(paid.id),
            amount: Set(amount),
            reason: Set(reason),
            status: Set(RefundStatus::Completed),
            processed_by: Set(ctx.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let order_reference = existing.reference_number.clone();
        let mut active = existing.into_active_model();
        active.paid_amount = Set(0);
        active.change_amount = Set(0);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        let mut active = paid.into_active_model();
        active.payment_status = Set(PaymentStatus::Refunded);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        record_activity(
            &txn,
            ctx.user_id,
            "refund",
            "refunds",
            Some(created.id),
            format!("Refunded order {order_reference}: {}", format_cents(amount)),
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "Refund processed: order={} amount={} by={}",
            order_reference,
            amount,
            ctx.username
        );
        Ok(created.into())
    }

    pub async fn list_payments(
        &self,
        ctx: &AuthContext,
        query: &PaymentQuery,
    ) -> AppResult<PaginatedResponse<PaymentResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let (from, to) = date_bounds(query.start_date.as_deref(), query.end_date.as_deref())?;

        let mut select = payment::Entity::find().filter(payment::Column::OutletId.eq(ctx.outlet_id));
        if let Some(status) = query.payment_status {
            select = select.filter(payment::Column::PaymentStatus.eq(status));
        }
        if let Some(from) = from {
            select = select.filter(payment::Column::PaymentDate.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(payment::Column::PaymentDate.lt(to));
        }

        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_desc(payment::Column::PaymentDate)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(
            rows.into_iter().map(PaymentResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn get_payment(
        &self,
        ctx: &AuthContext,
        payment_id: Uuid,
    ) -> AppResult<PaymentDetailResponse> {
        let row = payment::Entity::find_by_id(payment_id)
            .filter(payment::Column::OutletId.eq(ctx.outlet_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;
        let splits = payment_split::Entity::find()
            .filter(payment_split::Column::PaymentId.eq(row.id))
            .order_by_asc(payment_split::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(PaymentDetailResponse {
            payment: row.into(),
            splits: splits.into_iter().map(PaymentSplitResponse::from).collect(),
        })
    }
}

/// 分账中现金部分的金额
pub(crate) fn cash_portion(splits: &[payment_split::Model]) -> i64 {
    splits
        .iter()
        .filter(|s| s.payment_method == PaymentMethod::Cash)
        .map(|s| s.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(method: PaymentMethod, amount: i64) -> payment_split::Model {
        let now = Utc::now();
        payment_split::Model {
            id: Uuid::new_v4(),
            payment_id: Uuid::new_v4(),
            amount,
            payment_method: method,
            status: SplitStatus::Completed,
            reference_number: None,
            user_id: Uuid::new_v4(),
            created_at: now,
        }
    }

    #[test]
    fn test_cash_portion_ignores_other_methods() {
        let splits = vec![
            split(PaymentMethod::Cash, 5_000),
            split(PaymentMethod::Card, 7_000),
            split(PaymentMethod::Cash, 1_000),
        ];
        assert_eq!(cash_portion(&splits), 6_000);
        assert_eq!(cash_portion(&[]), 0);
    }
}
