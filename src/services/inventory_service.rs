use crate::entities::{
    InventoryTransactionType, ingredient_entity as ingredient, inventory_entity as inventory,
    inventory_transaction_entity as inventory_txn,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::utils::date_bounds;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// 一次库存变动的上下文
#[derive(Debug, Clone)]
pub struct StockMovement<'a> {
    pub outlet_id: Uuid,
    pub ingredient_id: Uuid,
    pub reason: &'a str,
    pub order_id: Option<Uuid>,
    pub user_id: Uuid,
}

/// 加行锁读取库存行，锁持有到外层事务结束
async fn lock_inventory<C: ConnectionTrait>(
    db: &C,
    outlet_id: Uuid,
    ingredient_id: Uuid,
) -> AppResult<Option<inventory::Model>> {
    let row = inventory::Entity::find()
        .filter(inventory::Column::OutletId.eq(outlet_id))
        .filter(inventory::Column::IngredientId.eq(ingredient_id))
        .lock_exclusive()
        .one(db)
        .await?;
    Ok(row)
}

/// 写入新库存量并追加一条带符号的流水
async fn write_movement<C: ConnectionTrait>(
    db: &C,
    current: Option<inventory::Model>,
    movement: &StockMovement<'_>,
    new_quantity: i32,
    transaction_type: InventoryTransactionType,
) -> AppResult<(inventory::Model, inventory_txn::Model)> {
    if new_quantity < 0 {
        return Err(AppError::InsufficientStock(format!(
            "Insufficient stock for ingredient {}",
            movement.ingredient_id
        )));
    }

    let now = Utc::now();
    let (delta, row) = match current {
        Some(row) => {
            let delta = new_quantity - row.quantity;
            let mut active = row.into_active_model();
            active.quantity = Set(new_quantity);
            active.last_updated = Set(now);
            (delta, active.update(db).await?)
        }
        None => {
            let row = inventory::ActiveModel {
                id: Set(Uuid::new_v4()),
                outlet_id: Set(movement.outlet_id),
                ingredient_id: Set(movement.ingredient_id),
                quantity: Set(new_quantity),
                last_updated: Set(now),
            }
            .insert(db)
            .await?;
            (new_quantity, row)
        }
    };

    let txn_row = inventory_txn::ActiveModel {
        id: Set(Uuid::new_v4()),
        outlet_id: Set(movement.outlet_id),
        ingredient_id: Set(movement.ingredient_id),
        transaction_type: Set(transaction_type),
        quantity: Set(delta),
        reason: Set(movement.reason.to_string()),
        order_id: Set(movement.order_id),
        user_id: Set(movement.user_id),
        created_at: Set(now),
    }
    .insert(db)
    .await?;

    Ok((row, txn_row))
}

/// 扣减库存；不存在的库存行视为 0，扣成负数时整个外层事务失败
pub async fn decrement<C: ConnectionTrait>(
    db: &C,
    movement: &StockMovement<'_>,
    quantity: i32,
) -> AppResult<(inventory::Model, inventory_txn::Model)> {
    if quantity <= 0 {
        return Err(AppError::ValidationError("Quantity must be positive".to_string()));
    }
    let current = lock_inventory(db, movement.outlet_id, movement.ingredient_id).await?;
    let on_hand = current.as_ref().map(|r| r.quantity).unwrap_or(0);
    if current.is_none() || on_hand < quantity {
        log::warn!(
            "Insufficient stock: ingredient={} on_hand={} requested={}",
            movement.ingredient_id,
            on_hand,
            quantity
        );
        return Err(AppError::InsufficientStock(format!(
            "Insufficient stock for ingredient {}: {} on hand, {} required",
            movement.ingredient_id, on_hand, quantity
        )));
    }
    write_movement(
        db,
        current,
        movement,
        on_hand - quantity,
        InventoryTransactionType::Remove,
    )
    .await
}

/// 增加库存，无上限
pub async fn increment<C: ConnectionTrait>(
    db: &C,
    movement: &StockMovement<'_>,
    quantity: i32,
) -> AppResult<(inventory::Model, inventory_txn::Model)> {
    if quantity <= 0 {
        return Err(AppError::ValidationError("Quantity must be positive".to_string()));
    }
    let current = lock_inventory(db, movement.outlet_id, movement.ingredient_id).await?;
    let on_hand = current.as_ref().map(|r| r.quantity).unwrap_or(0);
    let new_quantity = on_hand
        .checked_add(quantity)
        .ok_or_else(|| AppError::ValidationError("Quantity overflow".to_string()))?;
    write_movement(db, current, movement, new_quantity, InventoryTransactionType::Add).await
}

/// 盘点：设为绝对值，流水中记录差值
pub async fn adjust<C: ConnectionTrait>(
    db: &C,
    movement: &StockMovement<'_>,
    new_quantity: i32,
) -> AppResult<(inventory::Model, inventory_txn::Model)> {
    if new_quantity < 0 {
        return Err(AppError::ValidationError(
            "Adjusted quantity must not be negative".to_string(),
        ));
    }
    let current = lock_inventory(db, movement.outlet_id, movement.ingredient_id).await?;
    write_movement(db, current, movement, new_quantity, InventoryTransactionType::Adjust).await
}

#[derive(Clone)]
pub struct InventoryService {
    pool: DatabaseConnection,
}

impl InventoryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 手工入库/出库/盘点
    pub async fn record_transaction(
        &self,
        ctx: &AuthContext,
        req: InventoryTransactionRequest,
    ) -> AppResult<InventoryTransactionResult> {
        ctx.require_manager()?;
        let reason = req.reason.trim();
        if reason.is_empty() {
            return Err(AppError::ValidationError("Reason is required".to_string()));
        }

        let txn = self.pool.begin().await?;
        ingredient::Entity::find_by_id(req.ingredient_id)
            .filter(ingredient::Column::OutletId.eq(ctx.outlet_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Ingredient not found".to_string()))?;

        let movement = StockMovement {
            outlet_id: ctx.outlet_id,
            ingredient_id: req.ingredient_id,
            reason,
            order_id: None,
            user_id: ctx.user_id,
        };
        let (row, txn_row) = match req.transaction_type {
            InventoryTransactionType::Add => increment(&txn, &movement, req.quantity).await?,
            InventoryTransactionType::Remove => decrement(&txn, &movement, req.quantity).await?,
            InventoryTransactionType::Adjust => adjust(&txn, &movement, req.quantity).await?,
        };

        record_activity(
            &txn,
            ctx.user_id,
            "stock_update",
            "inventory_transactions",
            Some(txn_row.id),
            format!(
                "{} {} on ingredient {}: {}",
                req.transaction_type, txn_row.quantity, req.ingredient_id, reason
            ),
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "Stock {}: ingredient={} delta={} now={}",
            req.transaction_type,
            row.ingredient_id,
            txn_row.quantity,
            row.quantity
        );

        Ok(InventoryTransactionResult {
            transaction: txn_row.into(),
            inventory: InventorySnapshot {
                ingredient_id: row.ingredient_id,
                quantity: row.quantity,
                last_updated: row.last_updated,
            },
        })
    }

    pub async fn list_transactions(
        &self,
        ctx: &AuthContext,
        query: &InventoryTransactionQuery,
    ) -> AppResult<PaginatedResponse<InventoryTransactionResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let (from, to) = date_bounds(query.start_date.as_deref(), query.end_date.as_deref())?;

        let mut select =
            inventory_txn::Entity::find().filter(inventory_txn::Column::OutletId.eq(ctx.outlet_id));
        if let Some(ingredient_id) = query.ingredient_id {
            select = select.filter(inventory_txn::Column::IngredientId.eq(ingredient_id));
        }
        if let Some(from) = from {
            select = select.filter(inventory_txn::Column::CreatedAt.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(inventory_txn::Column::CreatedAt.lt(to));
        }

        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_desc(inventory_txn::Column::CreatedAt)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(InventoryTransactionResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn get_transaction(
        &self,
        ctx: &AuthContext,
        id: Uuid,
    ) -> AppResult<InventoryTransactionResponse> {
        inventory_txn::Entity::find_by_id(id)
            .filter(inventory_txn::Column::OutletId.eq(ctx.outlet_id))
            .one(&self.pool)
            .await?
            .map(InventoryTransactionResponse::from)
            .ok_or_else(|| AppError::NotFound("Inventory transaction not found".to_string()))
    }

    /// 库存量不高于最低库存的原料
    pub async fn low_stock(&self, ctx: &AuthContext) -> AppResult<Vec<LowStockItem>> {
        let ingredients = ingredient::Entity::find()
            .filter(ingredient::Column::OutletId.eq(ctx.outlet_id))
            .order_by_asc(ingredient::Column::Name)
            .all(&self.pool)
            .await?;
        let stock: HashMap<Uuid, i32> = inventory::Entity::find()
            .filter(inventory::Column::OutletId.eq(ctx.outlet_id))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|r| (r.ingredient_id, r.quantity))
            .collect();

        Ok(ingredients
            .into_iter()
            .filter_map(|i| {
                let quantity = stock.get(&i.id).copied().unwrap_or(0);
                (quantity <= i.minimum_stock).then(|| LowStockItem {
                    ingredient_id: i.id,
                    name: i.name,
                    unit: i.unit,
                    quantity,
                    minimum_stock: i.minimum_stock,
                })
            })
            .collect())
    }
}
