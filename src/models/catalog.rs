use crate::entities::{
    TableStatus, ingredient_entity, menu_category_entity, menu_ingredient_entity,
    menu_item_entity, table_entity, tax_entity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "Beverages")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<menu_category_entity::Model> for CategoryResponse {
    fn from(m: menu_category_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    pub category_id: Option<Uuid>,
    #[schema(example = "Iced Latte")]
    pub name: String,
    pub description: Option<String>,
    /// 单价(分)
    #[schema(example = 3500)]
    pub price: i64,
    pub photo_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub photo_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<menu_item_entity::Model> for MenuItemResponse {
    fn from(m: menu_item_entity::Model) -> Self {
        Self {
            id: m.id,
            category_id: m.category_id,
            name: m.name,
            description: m.description,
            price: m.price,
            photo_url: m.photo_url,
            is_active: m.is_active,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateIngredientRequest {
    #[schema(example = "Milk")]
    pub name: String,
    #[schema(example = "ml")]
    pub unit: String,
    #[schema(example = 500)]
    pub minimum_stock: i32,
    /// 初始库存，大于 0 时记录一条 add 流水
    pub initial_stock: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub minimum_stock: i32,
    pub quantity: i32,
}

impl IngredientResponse {
    pub fn new(m: ingredient_entity::Model, quantity: i32) -> Self {
        Self {
            id: m.id,
            name: m.name,
            unit: m.unit,
            minimum_stock: m.minimum_stock,
            quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpsertMenuIngredientRequest {
    pub menu_id: Uuid,
    pub ingredient_id: Uuid,
    /// 每份菜品消耗量
    #[schema(example = 200)]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuIngredientResponse {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: i32,
}

impl From<menu_ingredient_entity::Model> for MenuIngredientResponse {
    fn from(m: menu_ingredient_entity::Model) -> Self {
        Self {
            id: m.id,
            menu_id: m.menu_id,
            ingredient_id: m.ingredient_id,
            quantity: m.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTableRequest {
    #[schema(example = "A1")]
    pub table_number: String,
    pub capacity: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TableResponse {
    pub id: Uuid,
    pub table_number: String,
    pub capacity: i32,
    pub status: TableStatus,
}

impl From<table_entity::Model> for TableResponse {
    fn from(m: table_entity::Model) -> Self {
        Self {
            id: m.id,
            table_number: m.table_number,
            capacity: m.capacity,
            status: m.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTaxRequest {
    #[schema(example = "VAT")]
    pub name: String,
    /// 基点，1000 = 10%
    #[schema(example = 1000)]
    pub rate_bp: i32,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateTaxRequest {
    pub name: Option<String>,
    pub rate_bp: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaxResponse {
    pub id: Uuid,
    pub name: String,
    pub rate_bp: i32,
    pub is_active: bool,
}

impl From<tax_entity::Model> for TaxResponse {
    fn from(m: tax_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            rate_bp: m.rate_bp,
            is_active: m.is_active,
        }
    }
}
