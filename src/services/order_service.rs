use crate::entities::{
    InventoryTransactionType, OrderStatus, OrderType, TableStatus, customer_entity as customer,
    inventory_transaction_entity as inventory_txn, menu_ingredient_entity as recipe,
    menu_item_entity as menu_item, order_entity as order, order_item_entity as order_item,
    order_tax_entity as order_tax, outlet_entity as outlet, table_entity as table,
    user_entity as user,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::services::inventory_service::{self, StockMovement};
use crate::services::sequence::{self, ORDER_SCOPE};
use crate::services::tax_service::apply_order_taxes;
use crate::utils::{date_bounds, format_cents, order_period, order_reference, verify_password};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::BTreeMap;
use uuid::Uuid;

/// 下单时锁定的行项目
#[derive(Debug, Clone)]
struct PricedLine {
    menu_id: Uuid,
    quantity: i32,
    unit_price: i64,
    notes: Option<String>,
}

fn validate_items(items: &[OrderItemRequest]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::ValidationError(
            "Order must contain at least one item".to_string(),
        ));
    }
    if let Some(bad) = items.iter().find(|i| i.quantity <= 0) {
        return Err(AppError::ValidationError(format!(
            "Quantity for menu item {} must be positive",
            bad.menu_id
        )));
    }
    Ok(())
}

fn compute_subtotal(lines: &[PricedLine]) -> AppResult<i64> {
    lines.iter().try_fold(0i64, |acc, l| {
        l.unit_price
            .checked_mul(l.quantity as i64)
            .and_then(|line_total| acc.checked_add(line_total))
            .ok_or_else(|| AppError::ValidationError("Order amount overflow".to_string()))
    })
}

/// 在事务中把桌台设置为指定状态
pub(crate) async fn set_table_status<C: ConnectionTrait>(
    db: &C,
    table_id: Uuid,
    status: TableStatus,
) -> AppResult<()> {
    if let Some(row) = table::Entity::find_by_id(table_id).one(db).await? {
        let mut active = row.into_active_model();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;
    }
    Ok(())
}

async fn price_lines<C: ConnectionTrait>(
    db: &C,
    outlet_id: Uuid,
    items: &[OrderItemRequest],
) -> AppResult<Vec<PricedLine>> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let menu = menu_item::Entity::find_by_id(item.menu_id)
            .filter(menu_item::Column::OutletId.eq(outlet_id))
            .filter(menu_item::Column::IsActive.eq(true))
            .one(db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Menu item {} not found or inactive", item.menu_id))
            })?;
        lines.push(PricedLine {
            menu_id: menu.id,
            quantity: item.quantity,
            unit_price: menu.price,
            notes: item.notes.clone(),
        });
    }
    Ok(lines)
}

/// 按配方扣减每个行项目消耗的原料
async fn consume_ingredients<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    order_id: Uuid,
    reason: &str,
    lines: &[PricedLine],
) -> AppResult<()> {
    for line in lines {
        let recipe_rows = recipe::Entity::find()
            .filter(recipe::Column::MenuId.eq(line.menu_id))
            .filter(recipe::Column::OutletId.eq(ctx.outlet_id))
            .all(db)
            .await?;
        for r in recipe_rows {
            let needed = r
                .quantity
                .checked_mul(line.quantity)
                .ok_or_else(|| AppError::ValidationError("Quantity overflow".to_string()))?;
            let movement = StockMovement {
                outlet_id: ctx.outlet_id,
                ingredient_id: r.ingredient_id,
                reason,
                order_id: Some(order_id),
                user_id: ctx.user_id,
            };
            inventory_service::decrement(db, &movement, needed).await?;
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 下单：行项目、税额、库存扣减和桌台占用在同一事务内完成
    pub async fn create_order(
        &self,
        ctx: &AuthContext,
        req: CreateOrderRequest,
    ) -> AppResult<CreateOrderResponse> {
        validate_items(&req.items)?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let outlet = outlet::Entity::find_by_id(ctx.outlet_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Outlet not found".to_string()))?;

        if let Some(customer_id) = req.customer_id {
            customer::Entity::find_by_id(customer_id)
                .filter(customer::Column::OutletId.eq(ctx.outlet_id))
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;
        }

        if let Some(table_id) = req.table_id {
            let t = table::Entity::find_by_id(table_id)
                .filter(table::Column::OutletId.eq(ctx.outlet_id))
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Table not found".to_string()))?;
            if t.status == TableStatus::Occupied {
                return Err(AppError::Conflict(format!(
                    "Table {} is already occupied",
                    t.table_number
                )));
            }
        }

        let lines = price_lines(&txn, ctx.outlet_id, &req.items).await?;
        let subtotal = compute_subtotal(&lines)?;

        let seq = sequence::next_value(&txn, ORDER_SCOPE, ctx.outlet_id, &order_period(now), now).await?;
        let reference_number = order_reference(&outlet.outlet_code, now.date_naive(), seq);

        let order_id = Uuid::new_v4();
        let created = order::ActiveModel {
            id: Set(order_id),
            outlet_id: Set(ctx.outlet_id),
            table_id: Set(req.table_id),
            customer_id: Set(req.customer_id),
            user_id: Set(ctx.user_id),
            status: Set(OrderStatus::Pending),
            order_type: Set(req.order_type.unwrap_or(OrderType::DineIn)),
            subtotal: Set(subtotal),
            discount_id: Set(None),
            discount_amount: Set(0),
            tax_amount: Set(0),
            total_amount: Set(0),
            paid_amount: Set(0),
            change_amount: Set(0),
            reference_number: Set(reference_number.clone()),
            notes: Set(req.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let tax_amount = apply_order_taxes(&txn, order_id, ctx.outlet_id, subtotal, now).await?;
        let total_amount = subtotal + tax_amount;
        let mut active = created.into_active_model();
        active.tax_amount = Set(tax_amount);
        active.total_amount = Set(total_amount);
        active.update(&txn).await?;

        for line in &lines {
            order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                menu_id: Set(line.menu_id),
                quantity: Set(line.quantity),
                price: Set(line.unit_price),
                notes: Set(line.notes.clone()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        let reason = format!("Order {reference_number}");
        consume_ingredients(&txn, ctx, order_id, &reason, &lines).await?;

        if let Some(table_id) = req.table_id {
            set_table_status(&txn, table_id, TableStatus::Occupied).await?;
        }

        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "orders",
            Some(order_id),
            format!("Created order {reference_number} total {}", format_cents(total_amount)),
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "Order created: ref={} outlet={} items={} total={}",
            reference_number,
            ctx.outlet_id,
            lines.len(),
            total_amount
        );

        Ok(CreateOrderResponse {
            order_id,
            reference_number,
            subtotal,
            tax_amount,
            total_amount,
        })
    }

    /// 取消待支付订单：按该订单的扣减流水回补库存并释放桌台
    pub async fn cancel_order(
        &self,
        ctx: &AuthContext,
        order_id: Uuid,
        req: CancelOrderRequest,
    ) -> AppResult<OrderResponse> {
        let staff = user::Entity::find_by_id(ctx.user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User not found".to_string()))?;
        if !verify_password(&req.password, &staff.password_hash)? {
            return Err(AppError::AuthError("Invalid password".to_string()));
        }

        let txn = self.pool.begin().await?;
        let existing = order::Entity::find_by_id(order_id)
            .filter(order::Column::OutletId.eq(ctx.outlet_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        if existing.status != OrderStatus::Pending {
            return Err(AppError::ValidationError(format!(
                "Only pending orders can be canceled (order is {})",
                existing.status
            )));
        }

        let consumed = inventory_txn::Entity::find()
            .filter(inventory_txn::Column::OrderId.eq(order_id))
            .filter(inventory_txn::Column::TransactionType.eq(InventoryTransactionType::Remove))
            .all(&txn)
            .await?;
        let mut per_ingredient: BTreeMap<Uuid, i32> = BTreeMap::new();
        for row in consumed {
            *per_ingredient.entry(row.ingredient_id).or_default() += -row.quantity;
        }

        let reason = format!("Order {} canceled", existing.reference_number);
        for (ingredient_id, quantity) in per_ingredient {
            if quantity <= 0 {
                continue;
            }
            let movement = StockMovement {
                outlet_id: ctx.outlet_id,
                ingredient_id,
                reason: &reason,
                order_id: Some(order_id),
                user_id: ctx.user_id,
            };
            inventory_service::increment(&txn, &movement, quantity).await?;
        }

        let table_id = existing.table_id;
        let reference_number = existing.reference_number.clone();
        let mut active = existing.into_active_model();
        active.status = Set(OrderStatus::Canceled);
        if let Some(notes) = req.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        if let Some(table_id) = table_id {
            set_table_status(&txn, table_id, TableStatus::Available).await?;
        }

        record_activity(
            &txn,
            ctx.user_id,
            "cancel",
            "orders",
            Some(order_id),
            format!("Canceled order {reference_number}"),
        )
        .await?;
        txn.commit().await?;

        log::info!("Order canceled: ref={} by={}", reference_number, ctx.username);
        Ok(updated.into())
    }

    pub async fn list_orders(
        &self,
        ctx: &AuthContext,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let (from, to) = date_bounds(query.start_date.as_deref(), query.end_date.as_deref())?;

        let mut select = order::Entity::find().filter(order::Column::OutletId.eq(ctx.outlet_id));
        if let Some(status) = query.status {
            select = select.filter(order::Column::Status.eq(status));
        }
        if let Some(reference) = query.reference_number.as_deref().filter(|r| !r.is_empty()) {
            select = select.filter(order::Column::ReferenceNumber.contains(reference));
        }
        if let Some(customer_id) = query.customer_id {
            select = select.filter(order::Column::CustomerId.eq(customer_id));
        }
        if let Some(table_id) = query.table_id {
            select = select.filter(order::Column::TableId.eq(table_id));
        }
        if let Some(from) = from {
            select = select.filter(order::Column::CreatedAt.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(order::Column::CreatedAt.lt(to));
        }

        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_desc(order::Column::CreatedAt)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(OrderResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn get_order(&self, ctx: &AuthContext, order_id: Uuid) -> AppResult<OrderDetailResponse> {
        let row = order::Entity::find_by_id(order_id)
            .filter(order::Column::OutletId.eq(ctx.outlet_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        self.with_details(row).await
    }

    /// 桌台上当前待支付的订单
    pub async fn get_order_by_table(
        &self,
        ctx: &AuthContext,
        table_id: Uuid,
    ) -> AppResult<OrderDetailResponse> {
        let row = order::Entity::find()
            .filter(order::Column::OutletId.eq(ctx.outlet_id))
            .filter(order::Column::TableId.eq(table_id))
            .filter(order::Column::Status.eq(OrderStatus::Pending))
            .order_by_desc(order::Column::CreatedAt)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No pending order for this table".to_string()))?;
        self.with_details(row).await
    }

    async fn with_details(&self, row: order::Model) -> AppResult<OrderDetailResponse> {
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(row.id))
            .order_by_asc(order_item::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        let taxes = order_tax::Entity::find()
            .filter(order_tax::Column::OrderId.eq(row.id))
            .all(&self.pool)
            .await?;
        Ok(OrderDetailResponse {
            order: row.into(),
            items: items.into_iter().map(OrderItemResponse::from).collect(),
            taxes: taxes.into_iter().map(OrderTaxResponse::from).collect(),
        })
    }
}

/// 订单创建时间在 [from, to) 内的已完成订单
pub(crate) async fn completed_orders_between<C: ConnectionTrait>(
    db: &C,
    outlet_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> AppResult<Vec<order::Model>> {
    let rows = order::Entity::find()
        .filter(order::Column::OutletId.eq(outlet_id))
        .filter(order::Column::Status.eq(OrderStatus::Completed))
        .filter(order::Column::CreatedAt.gte(from))
        .filter(order::Column::CreatedAt.lt(to))
        .order_by_asc(order::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: i64, quantity: i32) -> PricedLine {
        PricedLine {
            menu_id: Uuid::new_v4(),
            quantity,
            unit_price: price,
            notes: None,
        }
    }

    #[test]
    fn test_subtotal_sums_price_times_quantity() {
        let lines = vec![line(3_500, 2), line(3_000, 1)];
        assert_eq!(compute_subtotal(&lines).unwrap(), 10_000);
    }

    #[test]
    fn test_subtotal_overflow_rejected() {
        let lines = vec![line(i64::MAX, 2)];
        assert!(compute_subtotal(&lines).is_err());
    }

    #[test]
    fn test_items_validation() {
        assert!(validate_items(&[]).is_err());
        let bad = OrderItemRequest {
            menu_id: Uuid::new_v4(),
            quantity: 0,
            notes: None,
        };
        assert!(validate_items(&[bad]).is_err());
    }
}
