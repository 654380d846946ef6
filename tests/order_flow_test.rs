mod common;

use common::*;
use pos_backend::AppError;
use pos_backend::entities::{OrderStatus, TableStatus, sequence_counter_entity as seq};
use pos_backend::services::sequence::ORDER_SCOPE;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use pos_backend::models::*;

#[tokio::test]
async fn create_order_computes_totals_and_consumes_stock() {
    let fx = setup().await;

    let created = fx
        .orders()
        .create_order(&fx.cashier, fx.order_request(Some(fx.table_id), 1))
        .await
        .unwrap();

    // 10% + 5% 的税额
    assert_eq!(created.subtotal, 10_000);
    assert_eq!(created.tax_amount, 1_500);
    assert_eq!(created.total_amount, 11_500);
    assert!(created.reference_number.starts_with("ODR-TST"));

    assert_eq!(fx.beans_on_hand().await, INITIAL_BEANS - BEANS_PER_COFFEE);
    assert_eq!(fx.table_status().await, TableStatus::Occupied);

    let detail = fx.orders().get_order(&fx.cashier, created.order_id).await.unwrap();
    assert_eq!(detail.order.status, OrderStatus::Pending);
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].price, COFFEE_PRICE);
    assert_eq!(detail.taxes.len(), 2);

    let by_table = fx
        .orders()
        .get_order_by_table(&fx.cashier, fx.table_id)
        .await
        .unwrap();
    assert_eq!(by_table.order.id, created.order_id);
}

#[tokio::test]
async fn order_lines_keep_price_at_order_time() {
    let fx = setup().await;
    let created = fx
        .orders()
        .create_order(&fx.cashier, fx.order_request(None, 1))
        .await
        .unwrap();

    fx.catalog()
        .update_menu_item(
            &fx.manager,
            fx.coffee_id,
            UpdateMenuItemRequest {
                category_id: None,
                name: None,
                description: None,
                price: Some(25_000),
                photo_url: None,
                is_active: None,
            },
        )
        .await
        .unwrap();

    let detail = fx.orders().get_order(&fx.cashier, created.order_id).await.unwrap();
    assert_eq!(detail.items[0].price, COFFEE_PRICE);
    assert_eq!(detail.order.subtotal, 10_000);
}

#[tokio::test]
async fn insufficient_stock_rejects_whole_order() {
    let fx = setup().await;

    let result = fx
        .orders()
        .create_order(&fx.cashier, fx.order_request(Some(fx.table_id), 11))
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock(_))));

    assert_eq!(fx.beans_on_hand().await, INITIAL_BEANS);
    assert_eq!(fx.table_status().await, TableStatus::Available);
    let listed = fx
        .orders()
        .list_orders(
            &fx.cashier,
            &OrderQuery {
                page: None,
                per_page: None,
                status: None,
                reference_number: None,
                customer_id: None,
                table_id: None,
                start_date: None,
                end_date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(listed.total, 0);
}

#[tokio::test]
async fn create_order_validates_input() {
    let fx = setup().await;

    let empty = CreateOrderRequest {
        table_id: None,
        customer_id: None,
        order_type: None,
        notes: None,
        items: vec![],
    };
    assert!(matches!(
        fx.orders().create_order(&fx.cashier, empty).await,
        Err(AppError::ValidationError(_))
    ));

    let mut unknown = fx.order_request(None, 1);
    unknown.items[0].menu_id = uuid::Uuid::new_v4();
    assert!(matches!(
        fx.orders().create_order(&fx.cashier, unknown).await,
        Err(AppError::NotFound(_))
    ));

    fx.orders()
        .create_order(&fx.cashier, fx.order_request(Some(fx.table_id), 1))
        .await
        .unwrap();
    assert!(matches!(
        fx.orders()
            .create_order(&fx.cashier, fx.order_request(Some(fx.table_id), 1))
            .await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn cancel_order_restores_stock_and_frees_table() {
    let fx = setup().await;
    let created = fx
        .orders()
        .create_order(&fx.cashier, fx.order_request(Some(fx.table_id), 3))
        .await
        .unwrap();
    assert_eq!(fx.beans_on_hand().await, INITIAL_BEANS - 3 * BEANS_PER_COFFEE);

    let wrong = fx
        .orders()
        .cancel_order(
            &fx.cashier,
            created.order_id,
            CancelOrderRequest {
                notes: None,
                password: "not-my-password".to_string(),
            },
        )
        .await;
    assert!(matches!(wrong, Err(AppError::AuthError(_))));

    let canceled = fx
        .orders()
        .cancel_order(
            &fx.cashier,
            created.order_id,
            CancelOrderRequest {
                notes: Some("customer left".to_string()),
                password: CASHIER_PASSWORD.to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(canceled.status, OrderStatus::Canceled);
    assert_eq!(fx.beans_on_hand().await, INITIAL_BEANS);
    assert_eq!(fx.table_status().await, TableStatus::Available);

    let again = fx
        .orders()
        .cancel_order(
            &fx.cashier,
            created.order_id,
            CancelOrderRequest {
                notes: None,
                password: CASHIER_PASSWORD.to_string(),
            },
        )
        .await;
    assert!(matches!(again, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn concurrent_orders_get_unique_references() {
    let fx = setup().await;
    let service = fx.orders();

    let futures = (0..5).map(|_| service.create_order(&fx.cashier, fx.order_request(None, 1)));
    let results = futures_util::future::join_all(futures).await;

    let mut references: Vec<String> = results
        .into_iter()
        .map(|r| r.unwrap().reference_number)
        .collect();
    references.sort();
    references.dedup();
    assert_eq!(references.len(), 5);
    assert_eq!(fx.beans_on_hand().await, INITIAL_BEANS - 5 * BEANS_PER_COFFEE);

    // 编号来自计数行而不是现有订单数
    let counter = seq::Entity::find()
        .filter(seq::Column::Scope.eq(ORDER_SCOPE))
        .filter(seq::Column::OutletId.eq(fx.outlet_id))
        .one(&fx.pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(counter.last_value, 5);
    let suffixes: Vec<i64> = references
        .iter()
        .map(|r| r.rsplit('-').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(suffixes, vec![1, 2, 3, 4, 5]);
}
