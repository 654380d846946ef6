mod common;

use common::*;
use pos_backend::AppError;
use pos_backend::entities::InventoryTransactionType;
use pos_backend::models::*;
use pos_backend::services::InventoryService;

fn movement(fx: &Fixture, kind: InventoryTransactionType, quantity: i32) -> InventoryTransactionRequest {
    InventoryTransactionRequest {
        ingredient_id: fx.beans_id,
        transaction_type: kind,
        quantity,
        reason: "Weekly delivery".to_string(),
    }
}

#[tokio::test]
async fn manual_movements_update_stock_and_ledger() {
    let fx = setup().await;
    let inventory = InventoryService::new(fx.pool.clone());

    let denied = inventory
        .record_transaction(&fx.cashier, movement(&fx, InventoryTransactionType::Add, 5))
        .await;
    assert!(matches!(denied, Err(AppError::PermissionDenied)));

    let added = inventory
        .record_transaction(&fx.manager, movement(&fx, InventoryTransactionType::Add, 50))
        .await
        .unwrap();
    assert_eq!(added.inventory.quantity, 150);
    assert_eq!(added.transaction.quantity, 50);

    let too_much = inventory
        .record_transaction(&fx.manager, movement(&fx, InventoryTransactionType::Remove, 200))
        .await;
    assert!(matches!(too_much, Err(AppError::InsufficientStock(_))));
    assert_eq!(fx.beans_on_hand().await, 150);

    // 盘点记录的是差值
    let adjusted = inventory
        .record_transaction(&fx.manager, movement(&fx, InventoryTransactionType::Adjust, 15))
        .await
        .unwrap();
    assert_eq!(adjusted.inventory.quantity, 15);
    assert_eq!(adjusted.transaction.quantity, -135);

    let low = inventory.low_stock(&fx.manager).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].ingredient_id, fx.beans_id);

    let ledger = inventory
        .list_transactions(
            &fx.manager,
            &InventoryTransactionQuery {
                page: None,
                per_page: None,
                ingredient_id: Some(fx.beans_id),
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap();
    // 初始入库 + 入库 + 盘点
    assert_eq!(ledger.total, 3);

    let one = inventory
        .get_transaction(&fx.manager, adjusted.transaction.id)
        .await
        .unwrap();
    assert_eq!(one.transaction_type, InventoryTransactionType::Adjust);
}

#[tokio::test]
async fn blank_reason_is_rejected() {
    let fx = setup().await;
    let mut req = movement(&fx, InventoryTransactionType::Add, 5);
    req.reason = "  ".to_string();
    let result = InventoryService::new(fx.pool.clone())
        .record_transaction(&fx.manager, req)
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}
