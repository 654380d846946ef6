use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_outlets_and_staff::{Outlets, Users};

#[derive(DeriveIden)]
enum Shifts {
    Table,
    Id,
    OutletId,
    CashierId,
    ShiftStart,
    ShiftEnd,
    InitialCash,
    ClosingCash,
    SystemCashTotal,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    ShiftId,
    Description,
    Amount,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shifts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shifts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Shifts::OutletId).uuid().not_null())
                    .col(ColumnDef::new(Shifts::CashierId).uuid().not_null())
                    .col(
                        ColumnDef::new(Shifts::ShiftStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Shifts::ShiftEnd).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Shifts::InitialCash).big_integer().not_null())
                    .col(ColumnDef::new(Shifts::ClosingCash).big_integer().null())
                    .col(ColumnDef::new(Shifts::SystemCashTotal).big_integer().null())
                    .col(
                        ColumnDef::new(Shifts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Shifts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shifts_outlet")
                            .from(Shifts::Table, Shifts::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shifts_cashier")
                            .from(Shifts::Table, Shifts::CashierId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_shifts_cashier_outlet")
                    .table(Shifts::Table)
                    .col(Shifts::CashierId)
                    .col(Shifts::OutletId)
                    .to_owned(),
            )
            .await?;

        // 每个收银员在同一门店最多一个未结束班次；部分索引 Postgres 与 SQLite 都支持
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_shifts_open_per_cashier \
                 ON shifts (outlet_id, cashier_id) WHERE shift_end IS NULL",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Expenses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Expenses::ShiftId).uuid().not_null())
                    .col(ColumnDef::new(Expenses::Description).text().not_null())
                    .col(ColumnDef::new(Expenses::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Expenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_shift")
                            .from(Expenses::Table, Expenses::ShiftId)
                            .to(Shifts::Table, Shifts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_created_by")
                            .from(Expenses::Table, Expenses::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Shifts::Table).to_owned())
            .await?;
        Ok(())
    }
}
