//! 按 (scope, outlet, period) 原子递增的编号计数器
//!
//! 计数行先以 ON CONFLICT DO NOTHING 插入，再用 UPDATE 自增；UPDATE 持有行锁直到外层事务提交，
//! 因此同一门店同一周期内并发的创建者拿到的序号互不相同。

use crate::entities::sequence_counter_entity as seq;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

pub const ORDER_SCOPE: &str = "order";
pub const MEMBER_SCOPE: &str = "member";

pub async fn next_value<C: ConnectionTrait>(
    db: &C,
    scope: &str,
    outlet_id: Uuid,
    period: &str,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    let insert = Query::insert()
        .into_table(seq::Entity)
        .columns([
            seq::Column::Scope,
            seq::Column::OutletId,
            seq::Column::Period,
            seq::Column::LastValue,
            seq::Column::UpdatedAt,
        ])
        .values_panic([
            scope.into(),
            outlet_id.into(),
            period.into(),
            0i64.into(),
            now.into(),
        ])
        .on_conflict(
            OnConflict::columns([
                seq::Column::Scope,
                seq::Column::OutletId,
                seq::Column::Period,
            ])
            .do_nothing()
            .to_owned(),
        )
        .to_owned();
    let backend = db.get_database_backend();
    db.execute(backend.build(&insert)).await?;

    seq::Entity::update_many()
        .col_expr(
            seq::Column::LastValue,
            Expr::col(seq::Column::LastValue).add(1),
        )
        .col_expr(seq::Column::UpdatedAt, Expr::value(now))
        .filter(seq::Column::Scope.eq(scope))
        .filter(seq::Column::OutletId.eq(outlet_id))
        .filter(seq::Column::Period.eq(period))
        .exec(db)
        .await?;

    let counter = seq::Entity::find_by_id((scope.to_string(), outlet_id, period.to_string()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Sequence counter {scope}/{period} missing")))?;

    Ok(counter.last_value)
}
