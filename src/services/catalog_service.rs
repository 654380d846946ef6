use crate::entities::{
    TableStatus, ingredient_entity as ingredient, inventory_entity as inventory,
    menu_category_entity as category, menu_ingredient_entity as recipe,
    menu_item_entity as menu_item, table_entity as table,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::services::inventory_service::{self, StockMovement};
use crate::utils::{format_cents, validate_amount};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

fn require_name(name: &str, what: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError(format!("{what} name is required")));
    }
    Ok(name.to_string())
}

async fn find_menu_item<C: ConnectionTrait>(
    db: &C,
    outlet_id: Uuid,
    id: Uuid,
) -> AppResult<menu_item::Model> {
    menu_item::Entity::find_by_id(id)
        .filter(menu_item::Column::OutletId.eq(outlet_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))
}

async fn ensure_category<C: ConnectionTrait>(
    db: &C,
    outlet_id: Uuid,
    category_id: Option<Uuid>,
) -> AppResult<()> {
    if let Some(id) = category_id {
        category::Entity::find_by_id(id)
            .filter(category::Column::OutletId.eq(outlet_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu category not found".to_string()))?;
    }
    Ok(())
}

/// 菜单、原料、配方与桌台
#[derive(Clone)]
pub struct CatalogService {
    pool: DatabaseConnection,
}

impl CatalogService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_category(
        &self,
        ctx: &AuthContext,
        req: CreateCategoryRequest,
    ) -> AppResult<CategoryResponse> {
        ctx.require_manager()?;
        let name = require_name(&req.name, "Category")?;
        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let created = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(ctx.outlet_id),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "menu_categories",
            Some(created.id),
            format!("Created category {}", created.name),
        )
        .await?;
        txn.commit().await?;
        Ok(created.into())
    }

    pub async fn list_categories(&self, ctx: &AuthContext) -> AppResult<Vec<CategoryResponse>> {
        let rows = category::Entity::find()
            .filter(category::Column::OutletId.eq(ctx.outlet_id))
            .order_by_asc(category::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CategoryResponse::from).collect())
    }

    pub async fn create_menu_item(
        &self,
        ctx: &AuthContext,
        req: CreateMenuItemRequest,
    ) -> AppResult<MenuItemResponse> {
        ctx.require_manager()?;
        let name = require_name(&req.name, "Menu item")?;
        validate_amount(req.price, "price")?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        ensure_category(&txn, ctx.outlet_id, req.category_id).await?;
        let created = menu_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(ctx.outlet_id),
            category_id: Set(req.category_id),
            name: Set(name),
            description: Set(req.description),
            price: Set(req.price),
            photo_url: Set(req.photo_url),
            is_active: Set(req.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "menu_items",
            Some(created.id),
            format!("Created menu item {} at {}", created.name, format_cents(created.price)),
        )
        .await?;
        txn.commit().await?;
        Ok(created.into())
    }

    /// 改价只影响之后的订单，已下单的行项目保留下单时单价
    pub async fn update_menu_item(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        req: UpdateMenuItemRequest,
    ) -> AppResult<MenuItemResponse> {
        ctx.require_manager()?;
        let txn = self.pool.begin().await?;
        let existing = find_menu_item(&txn, ctx.outlet_id, id).await?;
        ensure_category(&txn, ctx.outlet_id, req.category_id).await?;

        let mut active = existing.into_active_model();
        if let Some(category_id) = req.category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(name) = req.name {
            active.name = Set(require_name(&name, "Menu item")?);
        }
        if let Some(description) = req.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = req.price {
            validate_amount(price, "price")?;
            active.price = Set(price);
        }
        if let Some(photo_url) = req.photo_url {
            active.photo_url = Set(Some(photo_url));
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
            "menu_items",
            Some(updated.id),
            format!("Updated menu item {}", updated.name),
        )
        .await?;
        txn.commit().await?;
        Ok(updated.into())
    }

    pub async fn list_menu_items(&self, ctx: &AuthContext) -> AppResult<Vec<MenuItemResponse>> {
        let rows = menu_item::Entity::find()
            .filter(menu_item::Column::OutletId.eq(ctx.outlet_id))
            .order_by_asc(menu_item::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(MenuItemResponse::from).collect())
    }

    pub async fn get_menu_item(&self, ctx: &AuthContext, id: Uuid) -> AppResult<MenuItemResponse> {
        Ok(find_menu_item(&self.pool, ctx.outlet_id, id).await?.into())
    }

    /// 新建原料并建立库存行；初始库存大于 0 时记一条 add 流水
    pub async fn create_ingredient(
        &self,
        ctx: &AuthContext,
        req: CreateIngredientRequest,
    ) -> AppResult<IngredientResponse> {
        ctx.require_manager()?;
        let name = require_name(&req.name, "Ingredient")?;
        if req.minimum_stock < 0 {
            return Err(AppError::ValidationError(
                "minimum_stock must not be negative".to_string(),
            ));
        }
        let initial_stock = req.initial_stock.unwrap_or(0);
        if initial_stock < 0 {
            return Err(AppError::ValidationError(
                "initial_stock must not be negative".to_string(),
            ));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let created = ingredient::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(ctx.outlet_id),
            name: Set(name),
            unit: Set(req.unit),
            minimum_stock: Set(req.minimum_stock),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if initial_stock > 0 {
            let movement = StockMovement {
                outlet_id: ctx.outlet_id,
                ingredient_id: created.id,
                reason: "Initial stock",
                order_id: None,
                user_id: ctx.user_id,
            };
            inventory_service::increment(&txn, &movement, initial_stock).await?;
        } else {
            inventory::ActiveModel {
                id: Set(Uuid::new_v4()),
                outlet_id: Set(ctx.outlet_id),
                ingredient_id: Set(created.id),
                quantity: Set(0),
                last_updated: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "ingredients",
            Some(created.id),
            format!("Created ingredient {} with {} {}", created.name, initial_stock, created.unit),
        )
        .await?;
        txn.commit().await?;
        Ok(IngredientResponse::new(created, initial_stock))
    }

    pub async fn list_ingredients(&self, ctx: &AuthContext) -> AppResult<Vec<IngredientResponse>> {
        let rows = ingredient::Entity::find()
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
        Ok(rows
            .into_iter()
            .map(|i| {
                let quantity = stock.get(&i.id).copied().unwrap_or(0);
                IngredientResponse::new(i, quantity)
            })
            .collect())
    }

    /// 设置菜品的单份原料用量，已存在则覆盖
    pub async fn upsert_menu_ingredient(
        &self,
        ctx: &AuthContext,
        req: UpsertMenuIngredientRequest,
    ) -> AppResult<MenuIngredientResponse> {
        ctx.require_manager()?;
        if req.quantity <= 0 {
            return Err(AppError::ValidationError("Quantity must be positive".to_string()));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let menu = find_menu_item(&txn, ctx.outlet_id, req.menu_id).await?;
        ingredient::Entity::find_by_id(req.ingredient_id)
            .filter(ingredient::Column::OutletId.eq(ctx.outlet_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Ingredient not found".to_string()))?;

        let existing = recipe::Entity::find()
            .filter(recipe::Column::MenuId.eq(req.menu_id))
            .filter(recipe::Column::IngredientId.eq(req.ingredient_id))
            .one(&txn)
            .await?;
        let saved = match existing {
            Some(row) => {
                let mut active = row.into_active_model();
                active.quantity = Set(req.quantity);
                active.updated_at = Set(now);
                active.update(&txn).await?
            }
            None => {
                recipe::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    outlet_id: Set(ctx.outlet_id),
                    menu_id: Set(req.menu_id),
                    ingredient_id: Set(req.ingredient_id),
                    quantity: Set(req.quantity),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await?
            }
        };
        record_activity(
            &txn,
            ctx.user_id,
            "upsert",
            "menu_ingredients",
            Some(saved.id),
            format!("Recipe of {} uses {} per serving", menu.name, saved.quantity),
        )
        .await?;
        txn.commit().await?;
        Ok(saved.into())
    }

    pub async fn list_menu_ingredients(
        &self,
        ctx: &AuthContext,
        menu_id: Uuid,
    ) -> AppResult<Vec<MenuIngredientResponse>> {
        find_menu_item(&self.pool, ctx.outlet_id, menu_id).await?;
        let rows = recipe::Entity::find()
            .filter(recipe::Column::MenuId.eq(menu_id))
            .filter(recipe::Column::OutletId.eq(ctx.outlet_id))
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(MenuIngredientResponse::from).collect())
    }

    pub async fn create_table(
        &self,
        ctx: &AuthContext,
        req: CreateTableRequest,
    ) -> AppResult<TableResponse> {
        ctx.require_manager()?;
        let table_number = require_name(&req.table_number, "Table")?;
        let capacity = req.capacity.unwrap_or(4);
        if capacity <= 0 {
            return Err(AppError::ValidationError("Capacity must be positive".to_string()));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let created = table::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(ctx.outlet_id),
            table_number: Set(table_number),
            capacity: Set(capacity),
            status: Set(TableStatus::Available),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "tables",
            Some(created.id),
            format!("Created table {}", created.table_number),
        )
        .await?;
        txn.commit().await?;
        Ok(created.into())
    }

    pub async fn list_tables(&self, ctx: &AuthContext) -> AppResult<Vec<TableResponse>> {
        let rows = table::Entity::find()
            .filter(table::Column::OutletId.eq(ctx.outlet_id))
            .order_by_asc(table::Column::TableNumber)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(TableResponse::from).collect())
    }

    pub async fn get_table(&self, ctx: &AuthContext, id: Uuid) -> AppResult<TableResponse> {
        table::Entity::find_by_id(id)
            .filter(table::Column::OutletId.eq(ctx.outlet_id))
            .one(&self.pool)
            .await?
            .map(TableResponse::from)
            .ok_or_else(|| AppError::NotFound("Table not found".to_string()))
    }
}
