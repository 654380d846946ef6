//! 集成测试共用的内存数据库与基础数据
#![allow(dead_code)]

use chrono::Utc;
use pos_backend::config::{DatabaseConfig, LoyaltyConfig};
use pos_backend::database::{create_pool, run_migrations};
use pos_backend::entities::{
    UserRole, customer_point_entity as customer_point, outlet_entity as outlet,
    user_entity as user,
};
use pos_backend::models::*;
use pos_backend::services::*;
use pos_backend::utils::hash_password;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use uuid::Uuid;

pub const CASHIER_PASSWORD: &str = "cashier123";
/// 咖啡单价 100.00
pub const COFFEE_PRICE: i64 = 10_000;
/// 每杯咖啡消耗 10 单位咖啡豆，初始库存 100
pub const BEANS_PER_COFFEE: i32 = 10;
pub const INITIAL_BEANS: i32 = 100;

pub struct Fixture {
    pub pool: DatabaseConnection,
    pub outlet_id: Uuid,
    pub manager: AuthContext,
    pub cashier: AuthContext,
    pub other_cashier: AuthContext,
    pub coffee_id: Uuid,
    pub beans_id: Uuid,
    pub table_id: Uuid,
    pub tax_ids: Vec<Uuid>,
}

/// 单连接的内存 SQLite，执行真实迁移
pub async fn test_pool() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = create_pool(&config).await.expect("connect sqlite");
    run_migrations(&pool).await.expect("migrate");
    pool
}

async fn insert_user(
    pool: &DatabaseConnection,
    outlet_id: Uuid,
    username: &str,
    role: UserRole,
    password_hash: &str,
) -> AuthContext {
    let now = Utc::now();
    let u = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        outlet_id: Set(outlet_id),
        username: Set(username.to_string()),
        email: Set(None),
        password_hash: Set(password_hash.to_string()),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(pool)
    .await
    .expect("insert user");
    AuthContext {
        user_id: u.id,
        outlet_id,
        username: u.username,
        role,
    }
}

/// 门店 TST：10% 与 5% 两个税种、一款咖啡、咖啡豆库存和一张桌台
pub async fn setup() -> Fixture {
    let pool = test_pool().await;
    let now = Utc::now();

    let outlet_id = Uuid::new_v4();
    outlet::ActiveModel {
        id: Set(outlet_id),
        name: Set("Test Outlet".to_string()),
        address: Set(None),
        phone: Set(None),
        logo_url: Set(None),
        outlet_code: Set("TST".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&pool)
    .await
    .expect("insert outlet");

    let password_hash = hash_password(CASHIER_PASSWORD).expect("hash");
    let manager = insert_user(&pool, outlet_id, "manager01", UserRole::Manager, &password_hash).await;
    let cashier = insert_user(&pool, outlet_id, "cashier01", UserRole::Cashier, &password_hash).await;
    let other_cashier =
        insert_user(&pool, outlet_id, "cashier02", UserRole::Cashier, &password_hash).await;

    let taxes = TaxService::new(pool.clone());
    let mut tax_ids = Vec::new();
    for (name, rate_bp) in [("VAT", 1_000), ("Service", 500)] {
        let tax = taxes
            .create_tax(
                &manager,
                CreateTaxRequest {
                    name: name.to_string(),
                    rate_bp,
                    is_active: Some(true),
                },
            )
            .await
            .expect("create tax");
        tax_ids.push(tax.id);
    }

    let catalog = CatalogService::new(pool.clone());
    let coffee = catalog
        .create_menu_item(
            &manager,
            CreateMenuItemRequest {
                category_id: None,
                name: "Coffee".to_string(),
                description: None,
                price: COFFEE_PRICE,
                photo_url: None,
                is_active: Some(true),
            },
        )
        .await
        .expect("create menu item");
    let beans = catalog
        .create_ingredient(
            &manager,
            CreateIngredientRequest {
                name: "Beans".to_string(),
                unit: "g".to_string(),
                minimum_stock: 20,
                initial_stock: Some(INITIAL_BEANS),
            },
        )
        .await
        .expect("create ingredient");
    catalog
        .upsert_menu_ingredient(
            &manager,
            UpsertMenuIngredientRequest {
                menu_id: coffee.id,
                ingredient_id: beans.id,
                quantity: BEANS_PER_COFFEE,
            },
        )
        .await
        .expect("create recipe");
    let table = catalog
        .create_table(
            &manager,
            CreateTableRequest {
                table_number: "A1".to_string(),
                capacity: Some(4),
            },
        )
        .await
        .expect("create table");

    Fixture {
        pool,
        outlet_id,
        manager,
        cashier,
        other_cashier,
        coffee_id: coffee.id,
        beans_id: beans.id,
        table_id: table.id,
        tax_ids,
    }
}

impl Fixture {
    pub fn orders(&self) -> OrderService {
        OrderService::new(self.pool.clone())
    }

    pub fn payments(&self) -> PaymentService {
        PaymentService::new(self.pool.clone(), LoyaltyConfig::default())
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.pool.clone())
    }

    pub fn shifts(&self) -> ShiftService {
        ShiftService::new(self.pool.clone())
    }

    pub fn coffee(&self, quantity: i32) -> OrderItemRequest {
        OrderItemRequest {
            menu_id: self.coffee_id,
            quantity,
            notes: None,
        }
    }

    pub fn order_request(&self, table_id: Option<Uuid>, quantity: i32) -> CreateOrderRequest {
        CreateOrderRequest {
            table_id,
            customer_id: None,
            order_type: None,
            notes: None,
            items: vec![self.coffee(quantity)],
        }
    }

    pub fn cash(&self, amount: i64) -> PayOrderRequest {
        PayOrderRequest {
            amount,
            payment_method: pos_backend::entities::PaymentMethod::Cash,
            splits: None,
            redeem_reward_id: None,
            discount_id: None,
            customer_id: None,
            notes: None,
        }
    }

    pub async fn beans_on_hand(&self) -> i32 {
        self.catalog()
            .list_ingredients(&self.manager)
            .await
            .expect("list ingredients")
            .into_iter()
            .find(|i| i.id == self.beans_id)
            .map(|i| i.quantity)
            .expect("beans present")
    }

    pub async fn table_status(&self) -> pos_backend::entities::TableStatus {
        self.catalog()
            .get_table(&self.manager, self.table_id)
            .await
            .expect("get table")
            .status
    }

    /// 关闭全部税种，让订单总额等于小计
    pub async fn disable_taxes(&self) {
        let taxes = TaxService::new(self.pool.clone());
        for id in &self.tax_ids {
            taxes
                .update_tax(
                    &self.manager,
                    *id,
                    UpdateTaxRequest {
                        name: None,
                        rate_bp: None,
                        is_active: Some(false),
                    },
                )
                .await
                .expect("disable tax");
        }
    }

    pub async fn set_points(&self, customer_id: Uuid, points: i64) {
        let row = customer_point::Entity::find()
            .filter(customer_point::Column::CustomerId.eq(customer_id))
            .one(&self.pool)
            .await
            .expect("query points")
            .expect("points row");
        let mut active = row.into_active_model();
        active.total_points = Set(points);
        active.update(&self.pool).await.expect("update points");
    }

    pub async fn new_customer(&self) -> CustomerResponse {
        CustomerService::new(self.pool.clone())
            .create_customer(
                &self.cashier,
                CreateCustomerRequest {
                    name: "Budi".to_string(),
                    email: None,
                    phone: Some("0812000111".to_string()),
                    address: None,
                    membership_status: None,
                },
            )
            .await
            .expect("create customer")
    }
}
