use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_outlets_and_staff::{Outlets, Users};

#[derive(DeriveIden)]
enum MenuCategories {
    Table,
    Id,
    OutletId,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum MenuItems {
    Table,
    Id,
    OutletId,
    CategoryId,
    Name,
    Description,
    Price,
    PhotoUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Ingredients {
    Table,
    Id,
    OutletId,
    Name,
    Unit,
    MinimumStock,
    CreatedAt,
    UpdatedAt,
}

/// 菜品配方：每份菜品消耗的原料数量
#[derive(DeriveIden)]
enum MenuIngredients {
    Table,
    Id,
    OutletId,
    MenuId,
    IngredientId,
    Quantity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Inventories {
    Table,
    Id,
    OutletId,
    IngredientId,
    Quantity,
    LastUpdated,
}

/// 库存流水，quantity 为带符号的变动量
#[derive(DeriveIden)]
enum InventoryTransactions {
    Table,
    Id,
    OutletId,
    IngredientId,
    TransactionType,
    Quantity,
    Reason,
    OrderId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Tables {
    Table,
    Id,
    OutletId,
    TableNumber,
    Capacity,
    Status,
    CreatedAt,
    UpdatedAt,
}

/// 税率使用 basis points 存储 (10% = 1000)
#[derive(DeriveIden)]
pub enum Taxes {
    Table,
    Id,
    OutletId,
    Name,
    RateBp,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

fn timestamp_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuCategories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MenuCategories::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MenuCategories::OutletId).uuid().not_null())
                    .col(ColumnDef::new(MenuCategories::Name).string_len(100).not_null())
                    .col(&mut timestamp_col(MenuCategories::CreatedAt))
                    .col(&mut timestamp_col(MenuCategories::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_categories_outlet")
                            .from(MenuCategories::Table, MenuCategories::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MenuItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MenuItems::OutletId).uuid().not_null())
                    .col(ColumnDef::new(MenuItems::CategoryId).uuid().null())
                    .col(ColumnDef::new(MenuItems::Name).string_len(100).not_null())
                    .col(ColumnDef::new(MenuItems::Description).text().null())
                    // 单价(分)
                    .col(ColumnDef::new(MenuItems::Price).big_integer().not_null())
                    .col(ColumnDef::new(MenuItems::PhotoUrl).string_len(255).null())
                    .col(
                        ColumnDef::new(MenuItems::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(&mut timestamp_col(MenuItems::CreatedAt))
                    .col(&mut timestamp_col(MenuItems::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_items_outlet")
                            .from(MenuItems::Table, MenuItems::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_items_category")
                            .from(MenuItems::Table, MenuItems::CategoryId)
                            .to(MenuCategories::Table, MenuCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ingredients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Ingredients::OutletId).uuid().not_null())
                    .col(ColumnDef::new(Ingredients::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Ingredients::Unit).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Ingredients::MinimumStock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(&mut timestamp_col(Ingredients::CreatedAt))
                    .col(&mut timestamp_col(Ingredients::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ingredients_outlet")
                            .from(Ingredients::Table, Ingredients::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MenuIngredients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MenuIngredients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(MenuIngredients::OutletId).uuid().not_null())
                    .col(ColumnDef::new(MenuIngredients::MenuId).uuid().not_null())
                    .col(ColumnDef::new(MenuIngredients::IngredientId).uuid().not_null())
                    .col(ColumnDef::new(MenuIngredients::Quantity).integer().not_null())
                    .col(&mut timestamp_col(MenuIngredients::CreatedAt))
                    .col(&mut timestamp_col(MenuIngredients::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_ingredients_menu")
                            .from(MenuIngredients::Table, MenuIngredients::MenuId)
                            .to(MenuItems::Table, MenuItems::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_ingredients_ingredient")
                            .from(MenuIngredients::Table, MenuIngredients::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一菜品同一原料只允许一条配方
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_menu_ingredients_menu_ingredient_unique")
                    .table(MenuIngredients::Table)
                    .col(MenuIngredients::MenuId)
                    .col(MenuIngredients::IngredientId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Inventories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Inventories::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Inventories::OutletId).uuid().not_null())
                    .col(ColumnDef::new(Inventories::IngredientId).uuid().not_null())
                    .col(
                        ColumnDef::new(Inventories::Quantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(&mut timestamp_col(Inventories::LastUpdated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_ingredient")
                            .from(Inventories::Table, Inventories::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventories_outlet_ingredient_unique")
                    .table(Inventories::Table)
                    .col(Inventories::OutletId)
                    .col(Inventories::IngredientId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryTransactions::OutletId).uuid().not_null())
                    .col(
                        ColumnDef::new(InventoryTransactions::IngredientId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryTransactions::TransactionType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryTransactions::Quantity).integer().not_null())
                    .col(ColumnDef::new(InventoryTransactions::Reason).string_len(255).not_null())
                    .col(ColumnDef::new(InventoryTransactions::OrderId).uuid().null())
                    .col(ColumnDef::new(InventoryTransactions::UserId).uuid().not_null())
                    .col(&mut timestamp_col(InventoryTransactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_transactions_ingredient")
                            .from(
                                InventoryTransactions::Table,
                                InventoryTransactions::IngredientId,
                            )
                            .to(Ingredients::Table, Ingredients::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_transactions_user")
                            .from(InventoryTransactions::Table, InventoryTransactions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventory_transactions_outlet_ingredient")
                    .table(InventoryTransactions::Table)
                    .col(InventoryTransactions::OutletId)
                    .col(InventoryTransactions::IngredientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tables::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tables::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tables::OutletId).uuid().not_null())
                    .col(ColumnDef::new(Tables::TableNumber).string_len(10).not_null())
                    .col(ColumnDef::new(Tables::Capacity).integer().not_null().default(4))
                    .col(
                        ColumnDef::new(Tables::Status)
                            .string_len(20)
                            .not_null()
                            .default("available"),
                    )
                    .col(&mut timestamp_col(Tables::CreatedAt))
                    .col(&mut timestamp_col(Tables::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tables_outlet")
                            .from(Tables::Table, Tables::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tables_outlet_number_unique")
                    .table(Tables::Table)
                    .col(Tables::OutletId)
                    .col(Tables::TableNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Taxes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Taxes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Taxes::OutletId).uuid().not_null())
                    .col(ColumnDef::new(Taxes::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Taxes::RateBp).integer().not_null())
                    .col(
                        ColumnDef::new(Taxes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(&mut timestamp_col(Taxes::CreatedAt))
                    .col(&mut timestamp_col(Taxes::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_taxes_outlet")
                            .from(Taxes::Table, Taxes::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序与创建相反
        manager
            .drop_table(Table::drop().if_exists().table(Taxes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Tables::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(InventoryTransactions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Inventories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(MenuIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Ingredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(MenuItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(MenuCategories::Table).to_owned())
            .await?;
        Ok(())
    }
}
