use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_outlets_and_staff::{Outlets, Users};
use super::m20250901_000002_create_catalog_and_inventory::MenuItems;
use super::m20250901_000003_create_customers_and_orders::{Customers, Orders};

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    OutletId,
    OrderId,
    Amount,
    PaymentMethod,
    PaymentStatus,
    ReferenceNumber,
    PaymentDate,
    UserId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PaymentSplits {
    Table,
    Id,
    PaymentId,
    Amount,
    PaymentMethod,
    Status,
    ReferenceNumber,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Refunds {
    Table,
    Id,
    OrderId,
    PaymentId,
    Amount,
    Reason,
    Status,
    ProcessedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LoyaltyRewards {
    Table,
    Id,
    OutletId,
    Name,
    Description,
    PointsRequired,
    RewardType,
    Value,
    MenuId,
    Quantity,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LoyaltyTransactions {
    Table,
    Id,
    OutletId,
    CustomerId,
    OrderId,
    PointsEarned,
    PointsRedeemed,
    TransactionType,
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

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::OutletId).uuid().not_null())
                    .col(ColumnDef::new(Payments::OrderId).uuid().not_null())
                    .col(ColumnDef::new(Payments::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Payments::PaymentMethod).string_len(20).not_null())
                    .col(ColumnDef::new(Payments::PaymentStatus).string_len(20).not_null())
                    .col(ColumnDef::new(Payments::ReferenceNumber).string_len(100).null())
                    .col(&mut timestamp_col(Payments::PaymentDate))
                    .col(ColumnDef::new(Payments::UserId).uuid().not_null())
                    .col(ColumnDef::new(Payments::Notes).text().null())
                    .col(&mut timestamp_col(Payments::CreatedAt))
                    .col(&mut timestamp_col(Payments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_outlet")
                            .from(Payments::Table, Payments::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_order")
                            .from(Payments::Table, Payments::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_user")
                            .from(Payments::Table, Payments::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_user_date")
                    .table(Payments::Table)
                    .col(Payments::UserId)
                    .col(Payments::PaymentDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentSplits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PaymentSplits::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PaymentSplits::PaymentId).uuid().not_null())
                    .col(ColumnDef::new(PaymentSplits::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(PaymentSplits::PaymentMethod)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentSplits::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(PaymentSplits::ReferenceNumber)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(PaymentSplits::UserId).uuid().not_null())
                    .col(&mut timestamp_col(PaymentSplits::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_splits_payment")
                            .from(PaymentSplits::Table, PaymentSplits::PaymentId)
                            .to(Payments::Table, Payments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Refunds::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Refunds::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Refunds::OrderId).uuid().not_null())
                    .col(ColumnDef::new(Refunds::PaymentId).uuid().not_null())
                    .col(ColumnDef::new(Refunds::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Refunds::Reason).text().not_null())
                    .col(ColumnDef::new(Refunds::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Refunds::ProcessedBy).uuid().not_null())
                    .col(&mut timestamp_col(Refunds::CreatedAt))
                    .col(&mut timestamp_col(Refunds::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_refunds_order")
                            .from(Refunds::Table, Refunds::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_refunds_payment")
                            .from(Refunds::Table, Refunds::PaymentId)
                            .to(Payments::Table, Payments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_refunds_processed_by")
                            .from(Refunds::Table, Refunds::ProcessedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // value: discount 类为分，free_item 类不使用
        manager
            .create_table(
                Table::create()
                    .table(LoyaltyRewards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LoyaltyRewards::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(LoyaltyRewards::OutletId).uuid().not_null())
                    .col(ColumnDef::new(LoyaltyRewards::Name).string_len(100).not_null())
                    .col(ColumnDef::new(LoyaltyRewards::Description).text().null())
                    .col(
                        ColumnDef::new(LoyaltyRewards::PointsRequired)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoyaltyRewards::RewardType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoyaltyRewards::Value)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(LoyaltyRewards::MenuId).uuid().null())
                    .col(
                        ColumnDef::new(LoyaltyRewards::Quantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LoyaltyRewards::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(&mut timestamp_col(LoyaltyRewards::CreatedAt))
                    .col(&mut timestamp_col(LoyaltyRewards::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loyalty_rewards_outlet")
                            .from(LoyaltyRewards::Table, LoyaltyRewards::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loyalty_rewards_menu")
                            .from(LoyaltyRewards::Table, LoyaltyRewards::MenuId)
                            .to(MenuItems::Table, MenuItems::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LoyaltyTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoyaltyTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoyaltyTransactions::OutletId).uuid().not_null())
                    .col(ColumnDef::new(LoyaltyTransactions::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(LoyaltyTransactions::OrderId).uuid().not_null())
                    .col(
                        ColumnDef::new(LoyaltyTransactions::PointsEarned)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LoyaltyTransactions::PointsRedeemed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LoyaltyTransactions::TransactionType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(&mut timestamp_col(LoyaltyTransactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loyalty_transactions_customer")
                            .from(LoyaltyTransactions::Table, LoyaltyTransactions::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loyalty_transactions_order")
                            .from(LoyaltyTransactions::Table, LoyaltyTransactions::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(LoyaltyTransactions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(LoyaltyRewards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Refunds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(PaymentSplits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Payments::Table).to_owned())
            .await?;
        Ok(())
    }
}
