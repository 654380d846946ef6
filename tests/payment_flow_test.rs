mod common;

use chrono::{Duration, Utc};
use common::*;
use pos_backend::AppError;
use pos_backend::config::LoyaltyConfig;
use pos_backend::entities::{
    DiscountType, LoyaltyTransactionType, OrderStatus, PaymentMethod, PaymentStatus, RewardType,
    TableStatus, refund_entity,
};
use pos_backend::models::*;
use pos_backend::services::{CustomerService, DiscountService, LoyaltyService, PaymentService};
use sea_orm::{EntityTrait, PaginatorTrait};

async fn pending_order(fx: &Fixture, quantity: i32) -> CreateOrderResponse {
    fx.orders()
        .create_order(&fx.cashier, fx.order_request(Some(fx.table_id), quantity))
        .await
        .unwrap()
}

#[tokio::test]
async fn exact_tender_completes_order() {
    let fx = setup().await;
    let order = pending_order(&fx, 1).await;

    let paid = fx
        .payments()
        .pay_order(&fx.cashier, order.order_id, fx.cash(11_500))
        .await
        .unwrap();
    assert_eq!(paid.final_amount, 11_500);
    assert_eq!(paid.change_amount, 0);
    assert_eq!(paid.points_earned, 0);

    let detail = fx.orders().get_order(&fx.cashier, order.order_id).await.unwrap();
    assert_eq!(detail.order.status, OrderStatus::Completed);
    assert_eq!(detail.order.paid_amount, 11_500);
    assert_eq!(fx.table_status().await, TableStatus::Available);

    let payment = fx.payments().get_payment(&fx.cashier, paid.id).await.unwrap();
    assert_eq!(payment.payment.payment_status, PaymentStatus::Completed);
    assert_eq!(payment.splits.len(), 1);
    assert_eq!(payment.splits[0].amount, 11_500);

    // 已完成的订单不能再次支付
    let again = fx
        .payments()
        .pay_order(&fx.cashier, order.order_id, fx.cash(11_500))
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn discount_and_reward_reduce_amount_due() {
    let fx = setup().await;
    fx.disable_taxes().await;
    let customer = fx.new_customer().await;
    fx.set_points(customer.id, 150).await;

    let discount = DiscountService::new(fx.pool.clone())
        .create_discount(
            &fx.manager,
            CreateDiscountRequest {
                name: "Weekday 10%".to_string(),
                discount_type: DiscountType::Percentage,
                value: 1_000,
                is_member_only: Some(true),
                start_date: Utc::now() - Duration::days(1),
                end_date: None,
            },
        )
        .await
        .unwrap();
    let reward = LoyaltyService::new(fx.pool.clone())
        .create_reward(
            &fx.manager,
            CreateRewardRequest {
                name: "50 off".to_string(),
                description: None,
                points_required: 100,
                reward_type: RewardType::Discount,
                value: Some(5_000),
                menu_id: None,
                quantity: None,
            },
        )
        .await
        .unwrap();

    let order = pending_order(&fx, 2).await;
    assert_eq!(order.total_amount, 20_000);

    let mut req = fx.cash(15_000);
    req.customer_id = Some(customer.id);
    req.discount_id = Some(discount.id);
    req.redeem_reward_id = Some(reward.id);
    let paid = fx
        .payments()
        .pay_order(&fx.cashier, order.order_id, req)
        .await
        .unwrap();

    assert_eq!(paid.discount_amount, 2_000);
    assert_eq!(paid.reward_amount, 5_000);
    assert_eq!(paid.final_amount, 13_000);
    assert_eq!(paid.change_amount, 2_000);

    let after = CustomerService::new(fx.pool.clone())
        .get_customer(&fx.cashier, customer.id)
        .await
        .unwrap();
    assert_eq!(after.total_points, 50);

    let history = LoyaltyService::new(fx.pool.clone())
        .customer_transactions(&fx.cashier, customer.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|t| {
        t.transaction_type == LoyaltyTransactionType::Redeem && t.points_redeemed == 100
    }));
    assert!(history.iter().any(|t| t.transaction_type == LoyaltyTransactionType::Earn));
}

#[tokio::test]
async fn short_payment_leaves_order_pending() {
    let fx = setup().await;
    let order = pending_order(&fx, 1).await;

    let result = fx
        .payments()
        .pay_order(&fx.cashier, order.order_id, fx.cash(11_000))
        .await;
    assert!(matches!(result, Err(AppError::InsufficientPayment(_))));

    let detail = fx.orders().get_order(&fx.cashier, order.order_id).await.unwrap();
    assert_eq!(detail.order.status, OrderStatus::Pending);
    assert_eq!(detail.order.paid_amount, 0);
    assert_eq!(fx.table_status().await, TableStatus::Occupied);
}

#[tokio::test]
async fn redeeming_needs_more_points_than_required() {
    let fx = setup().await;
    let customer = fx.new_customer().await;
    fx.set_points(customer.id, 100).await;
    let reward = LoyaltyService::new(fx.pool.clone())
        .create_reward(
            &fx.manager,
            CreateRewardRequest {
                name: "Free coffee".to_string(),
                description: None,
                points_required: 100,
                reward_type: RewardType::FreeItem,
                value: None,
                menu_id: Some(fx.coffee_id),
                quantity: Some(1),
            },
        )
        .await
        .unwrap();
    let order = pending_order(&fx, 1).await;

    let mut req = fx.cash(11_500);
    req.customer_id = Some(customer.id);
    req.redeem_reward_id = Some(reward.id);
    let result = fx.payments().pay_order(&fx.cashier, order.order_id, req).await;
    assert!(matches!(result, Err(AppError::InsufficientPoints(_))));

    let after = CustomerService::new(fx.pool.clone())
        .get_customer(&fx.cashier, customer.id)
        .await
        .unwrap();
    assert_eq!(after.total_points, 100);
}

#[tokio::test]
async fn free_item_reward_removes_one_line_unit() {
    let fx = setup().await;
    let customer = fx.new_customer().await;
    fx.set_points(customer.id, 150).await;
    let reward = LoyaltyService::new(fx.pool.clone())
        .create_reward(
            &fx.manager,
            CreateRewardRequest {
                name: "Free coffee".to_string(),
                description: None,
                points_required: 100,
                reward_type: RewardType::FreeItem,
                value: None,
                menu_id: Some(fx.coffee_id),
                quantity: Some(1),
            },
        )
        .await
        .unwrap();
    let order = pending_order(&fx, 3).await;
    assert_eq!(order.total_amount, 34_500);

    let mut req = fx.cash(24_500);
    req.customer_id = Some(customer.id);
    req.redeem_reward_id = Some(reward.id);
    let paid = fx
        .payments()
        .pay_order(&fx.cashier, order.order_id, req)
        .await
        .unwrap();
    assert_eq!(paid.reward_amount, COFFEE_PRICE);
    assert_eq!(paid.final_amount, 24_500);
    assert_eq!(paid.change_amount, 0);

    // 免费的那一杯从订单行里扣掉
    let detail = fx.orders().get_order(&fx.cashier, order.order_id).await.unwrap();
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].quantity, 2);
    assert_eq!(detail.order.status, OrderStatus::Completed);

    let after = CustomerService::new(fx.pool.clone())
        .get_customer(&fx.cashier, customer.id)
        .await
        .unwrap();
    assert_eq!(after.total_points, 50);

    let history = LoyaltyService::new(fx.pool.clone())
        .customer_transactions(&fx.cashier, customer.id)
        .await
        .unwrap();
    assert!(history.iter().any(|t| {
        t.transaction_type == LoyaltyTransactionType::Redeem && t.points_redeemed == 100
    }));
}

#[tokio::test]
async fn split_payment_must_match_tendered_amount() {
    let fx = setup().await;
    let order = pending_order(&fx, 1).await;

    let mut bad = fx.cash(11_500);
    bad.splits = Some(vec![
        PaymentSplitRequest {
            payment_method: PaymentMethod::Cash,
            amount: 5_000,
        },
        PaymentSplitRequest {
            payment_method: PaymentMethod::Card,
            amount: 5_000,
        },
    ]);
    let result = fx.payments().pay_order(&fx.cashier, order.order_id, bad).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));

    let mut good = fx.cash(11_500);
    good.splits = Some(vec![
        PaymentSplitRequest {
            payment_method: PaymentMethod::Cash,
            amount: 5_000,
        },
        PaymentSplitRequest {
            payment_method: PaymentMethod::Card,
            amount: 6_500,
        },
    ]);
    let paid = fx
        .payments()
        .pay_order(&fx.cashier, order.order_id, good)
        .await
        .unwrap();
    let detail = fx.payments().get_payment(&fx.cashier, paid.id).await.unwrap();
    assert_eq!(detail.splits.len(), 2);
    assert_eq!(detail.splits.iter().map(|s| s.amount).sum::<i64>(), 11_500);
}

#[tokio::test]
async fn customer_earns_points_per_configured_unit() {
    let fx = setup().await;
    let customer = fx.new_customer().await;
    let payments = PaymentService::new(fx.pool.clone(), LoyaltyConfig { earn_unit: 1_000 });
    let order = pending_order(&fx, 1).await;

    let mut req = fx.cash(20_000);
    req.customer_id = Some(customer.id);
    let paid = payments
        .pay_order(&fx.cashier, order.order_id, req)
        .await
        .unwrap();
    assert_eq!(paid.points_earned, 11);
    assert_eq!(paid.change_amount, 8_500);

    let after = CustomerService::new(fx.pool.clone())
        .get_customer(&fx.cashier, customer.id)
        .await
        .unwrap();
    assert_eq!(after.total_points, 11);
}

#[tokio::test]
async fn refund_is_manager_only_and_happens_once() {
    let fx = setup().await;
    let order = pending_order(&fx, 1).await;
    let paid = fx
        .payments()
        .pay_order(&fx.cashier, order.order_id, fx.cash(12_000))
        .await
        .unwrap();

    let request = || RefundRequest {
        payment_id: paid.id,
        reason: "Wrong order".to_string(),
    };

    let by_cashier = fx
        .payments()
        .refund_payment(&fx.cashier, order.order_id, request())
        .await;
    assert!(matches!(by_cashier, Err(AppError::PermissionDenied)));

    let refund = fx
        .payments()
        .refund_payment(&fx.manager, order.order_id, request())
        .await
        .unwrap();
    assert_eq!(refund.amount, 11_500);
    assert_eq!(refund.processed_by, fx.manager.user_id);

    let payment = fx.payments().get_payment(&fx.manager, paid.id).await.unwrap();
    assert_eq!(payment.payment.payment_status, PaymentStatus::Refunded);
    let detail = fx.orders().get_order(&fx.manager, order.order_id).await.unwrap();
    assert_eq!(detail.order.paid_amount, 0);
    assert_eq!(detail.order.change_amount, 0);

    let twice = fx
        .payments()
        .refund_payment(&fx.manager, order.order_id, request())
        .await;
    assert!(matches!(twice, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn refund_cannot_exceed_tendered_amount() {
    let fx = setup().await;
    let discount = DiscountService::new(fx.pool.clone())
        .create_discount(
            &fx.manager,
            CreateDiscountRequest {
                name: "Flat 15".to_string(),
                discount_type: DiscountType::Fixed,
                value: 1_500,
                is_member_only: None,
                start_date: Utc::now() - Duration::days(1),
                end_date: None,
            },
        )
        .await
        .unwrap();
    let order = pending_order(&fx, 1).await;

    let mut req = fx.cash(10_000);
    req.discount_id = Some(discount.id);
    let paid = fx
        .payments()
        .pay_order(&fx.cashier, order.order_id, req)
        .await
        .unwrap();
    assert_eq!(paid.final_amount, 10_000);

    let result = fx
        .payments()
        .refund_payment(
            &fx.manager,
            order.order_id,
            RefundRequest {
                payment_id: paid.id,
                reason: "Complaint".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));

    // 拒绝后支付与订单保持原样，也没有写入退款记录
    let payment = fx.payments().get_payment(&fx.manager, paid.id).await.unwrap();
    assert_eq!(payment.payment.payment_status, PaymentStatus::Completed);
    let detail = fx.orders().get_order(&fx.manager, order.order_id).await.unwrap();
    assert_eq!(detail.order.status, OrderStatus::Completed);
    assert_eq!(detail.order.paid_amount, 10_000);
    assert_eq!(refund_entity::Entity::find().count(&fx.pool).await.unwrap(), 0);
}
