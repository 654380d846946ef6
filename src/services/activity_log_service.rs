use crate::entities::activity_log_entity as activity_log;
use crate::error::AppResult;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use uuid::Uuid;

/// 在调用方的事务中追加一条操作日志
pub async fn record_activity<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    action: &str,
    table_name: &str,
    record_id: Option<Uuid>,
    description: impl Into<String>,
) -> AppResult<()> {
    activity_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        action: Set(action.to_string()),
        table_name: Set(table_name.to_string()),
        record_id: Set(record_id),
        description: Set(Some(description.into())),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(())
}
