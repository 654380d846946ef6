use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub enum Outlets {
    Table,
    Id,
    Name,
    Address,
    Phone,
    LogoUrl,
    OutletCode,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    OutletId,
    Username,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ActivityLogs {
    Table,
    Id,
    UserId,
    Action,
    TableName,
    RecordId,
    Description,
    CreatedAt,
}

/// 按 (scope, outlet, period) 递增的编号计数器，用于订单号与会员号
#[derive(DeriveIden)]
enum SequenceCounters {
    Table,
    Scope,
    OutletId,
    Period,
    LastValue,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Outlets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Outlets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Outlets::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Outlets::Address).text().null())
                    .col(ColumnDef::new(Outlets::Phone).string_len(20).null())
                    .col(ColumnDef::new(Outlets::LogoUrl).string_len(255).null())
                    .col(
                        ColumnDef::new(Outlets::OutletCode)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Outlets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Outlets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::OutletId).uuid().not_null())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string_len(255).null())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_outlet")
                            .from(Users::Table, Users::OutletId)
                            .to(Outlets::Table, Outlets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 操作日志，不加外键，用户删除后仍保留
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ActivityLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ActivityLogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(ActivityLogs::Action).string_len(50).not_null())
                    .col(ColumnDef::new(ActivityLogs::TableName).string_len(50).not_null())
                    .col(ColumnDef::new(ActivityLogs::RecordId).uuid().null())
                    .col(ColumnDef::new(ActivityLogs::Description).text().null())
                    .col(
                        ColumnDef::new(ActivityLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activity_logs_user")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SequenceCounters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SequenceCounters::Scope).string_len(20).not_null())
                    .col(ColumnDef::new(SequenceCounters::OutletId).uuid().not_null())
                    .col(ColumnDef::new(SequenceCounters::Period).string_len(8).not_null())
                    .col(
                        ColumnDef::new(SequenceCounters::LastValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SequenceCounters::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(SequenceCounters::Scope)
                            .col(SequenceCounters::OutletId)
                            .col(SequenceCounters::Period),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(SequenceCounters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(ActivityLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Outlets::Table).to_owned())
            .await?;
        Ok(())
    }
}
