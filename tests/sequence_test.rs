//! 多连接共享同一个 SQLite 文件库，验证编号计数器在真实并发下的唯一性

use chrono::Utc;
use pos_backend::config::DatabaseConfig;
use pos_backend::database::{create_pool, run_migrations};
use pos_backend::entities::sequence_counter_entity as seq;
use pos_backend::services::sequence::{ORDER_SCOPE, next_value};
use pos_backend::{AppError, AppResult};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, TransactionTrait,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;
use uuid::Uuid;

const WORKERS: usize = 4;
const PERIOD: &str = "20250301";
const COUNTED_SCOPE: &str = "counted";

async fn shared_pool(dir: &tempfile::TempDir) -> DatabaseConnection {
    let path = dir.path().join("pos.db");
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: WORKERS as u32,
    };
    let pool = create_pool(&config).await.expect("connect sqlite file");
    run_migrations(&pool).await.expect("migrate");
    pool
}

/// 先数已有编号再插入下一个，编号写进唯一主键 (scope, outlet, period)
async fn count_then_insert<C: ConnectionTrait>(db: &C, outlet_id: Uuid) -> AppResult<i64> {
    let value = seq::Entity::find()
        .filter(seq::Column::Scope.eq(COUNTED_SCOPE))
        .filter(seq::Column::OutletId.eq(outlet_id))
        .count(db)
        .await? as i64
        + 1;
    seq::Entity::insert(seq::ActiveModel {
        scope: Set(COUNTED_SCOPE.to_string()),
        outlet_id: Set(outlet_id),
        period: Set(format!("{value:04}")),
        last_value: Set(value),
        updated_at: Set(Utc::now()),
    })
    .exec_without_returning(db)
    .await?;
    Ok(value)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn counter_is_unique_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let pool = shared_pool(&dir).await;
    let outlet_id = Uuid::new_v4();
    let barrier = Arc::new(Barrier::new(WORKERS));

    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let pool = pool.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                let txn = pool.begin().await;
                // 所有事务都已开启后再同时取号
                barrier.wait().await;
                let txn = txn?;
                let value = next_value(&txn, ORDER_SCOPE, outlet_id, PERIOD, Utc::now()).await?;
                tokio::time::sleep(Duration::from_millis(20)).await;
                txn.commit().await?;
                Ok::<i64, AppError>(value)
            })
        })
        .collect();

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap().unwrap());
    }
    values.sort();
    assert_eq!(values, (1..=WORKERS as i64).collect::<Vec<_>>());

    let counter = seq::Entity::find_by_id((ORDER_SCOPE.to_string(), outlet_id, PERIOD.to_string()))
        .one(&pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(counter.last_value, WORKERS as i64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn counting_existing_rows_races_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let pool = shared_pool(&dir).await;
    let outlet_id = Uuid::new_v4();
    let barrier = Arc::new(Barrier::new(WORKERS));

    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let pool = pool.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                let txn = pool.begin().await;
                let counted = match &txn {
                    Ok(txn) => seq::Entity::find()
                        .filter(seq::Column::Scope.eq(COUNTED_SCOPE))
                        .filter(seq::Column::OutletId.eq(outlet_id))
                        .count(txn)
                        .await
                        .map_err(AppError::from),
                    Err(_) => Ok(0),
                };
                // 所有事务都读过现有数量之后才开始写
                barrier.wait().await;
                let txn = txn?;
                counted?;
                let value = count_then_insert(&txn, outlet_id).await?;
                txn.commit().await?;
                Ok::<i64, AppError>(value)
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    let succeeded: Vec<i64> = results.iter().filter_map(|r| r.as_ref().ok().copied()).collect();
    let distinct: HashSet<i64> = succeeded.iter().copied().collect();

    // 读到同一个数量的并发事务不可能全部拿到不同编号
    assert!(succeeded.len() < WORKERS || distinct.len() < WORKERS);
    assert!(!succeeded.is_empty());
}
