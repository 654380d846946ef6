use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_outlets_and_staff::{Outlets, Users};
use super::m20250901_000002_create_catalog_and_inventory::{MenuItems, Tables, Taxes};

#[derive(DeriveIden)]
pub enum Customers {
    Table,
    Id,
    OutletId,
    Name,
    Email,
    Phone,
    Address,
    MembershipNumber,
    MembershipStatus,
    MembershipStartDate,
    CreatedAt,
    UpdatedAt,
}

/// 会员积分余额（每个门店一条）
#[derive(DeriveIden)]
enum CustomerPoints {
    Table,
    Id,
    OutletId,
    CustomerId,
    TotalPoints,
    CreatedAt,
    UpdatedAt,
}

/// 折扣：percentage 时 value 为 basis points，fixed 时 value 为分
#[derive(DeriveIden)]
enum Discounts {
    Table,
    Id,
    OutletId,
    Name,
    DiscountType,
    Value,
    IsMemberOnly,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Orders {
    Table,
    Id,
    OutletId,
    TableId,
    CustomerId,
    UserId,
    Status,
    OrderType,
    Subtotal,
    DiscountId,
    DiscountAmount,
    TaxAmount,
    TotalAmount,
    PaidAmount,
    ChangeAmount,
    ReferenceNumber,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    MenuId,
    Quantity,
    Price,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OrderTaxes {
    Table,
    Id,
    OrderId,
    TaxId,
    RateBp,
    TaxAmount,
    CreatedAt,
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

fn money_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .default(0)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::OutletId).uuid().not_null())
                    .col(ColumnDef::new(Customers::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Customers::Email).string_len(100).null())
                    .col(ColumnDef::new(Customers::Phone).string_len(20).null())
                    .col(ColumnDef::new(Customers::Address).string_len(255).null())
                    .col(
                        ColumnDef::new(Customers::MembershipNumber)
                            .string_len(30)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Customers::MembershipStatus)
                            .string_len(10)
                            .not_null()
                            .default("active"),
                    )
                    .col(&mut timestamp_col(Customers::MembershipStartDate))
                    .col(&mut timestamp_col(Customers::CreatedAt))
                    .col(&mut timestamp_col(Customers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customers_outlet")
                            .from(Customers::Table, Customers::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerPoints::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CustomerPoints::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CustomerPoints::OutletId).uuid().not_null())
                    .col(ColumnDef::new(CustomerPoints::CustomerId).uuid().not_null())
                    .col(
                        ColumnDef::new(CustomerPoints::TotalPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(&mut timestamp_col(CustomerPoints::CreatedAt))
                    .col(&mut timestamp_col(CustomerPoints::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_points_customer")
                            .from(CustomerPoints::Table, CustomerPoints::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customer_points_outlet_customer_unique")
                    .table(CustomerPoints::Table)
                    .col(CustomerPoints::OutletId)
                    .col(CustomerPoints::CustomerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Discounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Discounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Discounts::OutletId).uuid().not_null())
                    .col(ColumnDef::new(Discounts::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Discounts::DiscountType).string_len(20).not_null())
                    .col(ColumnDef::new(Discounts::Value).big_integer().not_null())
                    .col(
                        ColumnDef::new(Discounts::IsMemberOnly)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Discounts::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Discounts::EndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(&mut timestamp_col(Discounts::CreatedAt))
                    .col(&mut timestamp_col(Discounts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_discounts_outlet")
                            .from(Discounts::Table, Discounts::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 金额字段统一使用分 (BIGINT)
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Orders::OutletId).uuid().not_null())
                    .col(ColumnDef::new(Orders::TableId).uuid().null())
                    .col(ColumnDef::new(Orders::CustomerId).uuid().null())
                    .col(ColumnDef::new(Orders::UserId).uuid().not_null())
                    .col(ColumnDef::new(Orders::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Orders::OrderType).string_len(20).not_null())
                    .col(&mut money_col(Orders::Subtotal))
                    .col(ColumnDef::new(Orders::DiscountId).uuid().null())
                    .col(&mut money_col(Orders::DiscountAmount))
                    .col(&mut money_col(Orders::TaxAmount))
                    .col(&mut money_col(Orders::TotalAmount))
                    .col(&mut money_col(Orders::PaidAmount))
                    .col(&mut money_col(Orders::ChangeAmount))
                    .col(
                        ColumnDef::new(Orders::ReferenceNumber)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Orders::Notes).text().null())
                    .col(&mut timestamp_col(Orders::CreatedAt))
                    .col(&mut timestamp_col(Orders::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_outlet")
                            .from(Orders::Table, Orders::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_table")
                            .from(Orders::Table, Orders::TableId)
                            .to(Tables::Table, Tables::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_customer")
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_discount")
                            .from(Orders::Table, Orders::DiscountId)
                            .to(Discounts::Table, Discounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_outlet_created")
                    .table(Orders::Table)
                    .col(Orders::OutletId)
                    .col(Orders::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrderItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                    .col(ColumnDef::new(OrderItems::MenuId).uuid().not_null())
                    .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                    // 下单时锁定的单价(分)
                    .col(ColumnDef::new(OrderItems::Price).big_integer().not_null())
                    .col(ColumnDef::new(OrderItems::Notes).text().null())
                    .col(&mut timestamp_col(OrderItems::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_menu")
                            .from(OrderItems::Table, OrderItems::MenuId)
                            .to(MenuItems::Table, MenuItems::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderTaxes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrderTaxes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(OrderTaxes::OrderId).uuid().not_null())
                    .col(ColumnDef::new(OrderTaxes::TaxId).uuid().not_null())
                    .col(ColumnDef::new(OrderTaxes::RateBp).integer().not_null())
                    .col(ColumnDef::new(OrderTaxes::TaxAmount).big_integer().not_null())
                    .col(&mut timestamp_col(OrderTaxes::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_taxes_order")
                            .from(OrderTaxes::Table, OrderTaxes::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_taxes_tax")
                            .from(OrderTaxes::Table, OrderTaxes::TaxId)
                            .to(Taxes::Table, Taxes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(OrderTaxes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Discounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(CustomerPoints::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Customers::Table).to_owned())
            .await?;
        Ok(())
    }
}
