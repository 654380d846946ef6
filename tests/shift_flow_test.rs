mod common;

use chrono::Utc;
use common::*;
use pos_backend::AppError;
use pos_backend::entities::{PaymentMethod, shift_entity};
use pos_backend::models::*;
use pos_backend::services::ReportService;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

fn open(initial_cash: i64) -> CreateShiftRequest {
    CreateShiftRequest {
        shift_start: None,
        initial_cash,
    }
}

fn expense(shift_id: uuid::Uuid, amount: i64) -> CreateExpenseRequest {
    CreateExpenseRequest {
        shift_id,
        description: "Ice".to_string(),
        amount,
    }
}

#[tokio::test]
async fn cashier_has_one_open_shift_at_a_time() {
    let fx = setup().await;
    let shift = fx.shifts().create_shift(&fx.cashier, open(50_000)).await.unwrap();
    assert!(shift.is_active);

    let second = fx.shifts().create_shift(&fx.cashier, open(10_000)).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    // 其他收银员不受影响
    fx.shifts()
        .create_shift(&fx.other_cashier, open(10_000))
        .await
        .unwrap();
}

#[tokio::test]
async fn expenses_belong_to_the_shift_cashier_while_open() {
    let fx = setup().await;
    let shift = fx.shifts().create_shift(&fx.cashier, open(50_000)).await.unwrap();

    let foreign = fx
        .shifts()
        .create_expense(&fx.other_cashier, expense(shift.id, 1_000))
        .await;
    assert!(matches!(foreign, Err(AppError::Forbidden(_))));

    let non_positive = fx.shifts().create_expense(&fx.cashier, expense(shift.id, 0)).await;
    assert!(matches!(non_positive, Err(AppError::ValidationError(_))));

    fx.shifts()
        .create_expense(&fx.cashier, expense(shift.id, 1_000))
        .await
        .unwrap();

    let by_other = fx
        .shifts()
        .end_shift(&fx.other_cashier, shift.id, EndShiftRequest { closing_cash: 0 })
        .await;
    assert!(matches!(by_other, Err(AppError::Forbidden(_))));

    fx.shifts()
        .end_shift(&fx.cashier, shift.id, EndShiftRequest { closing_cash: 49_000 })
        .await
        .unwrap();
    assert!(!fx.shifts().is_shift_active(&fx.cashier, shift.id).await.unwrap());

    let late = fx.shifts().create_expense(&fx.cashier, expense(shift.id, 500)).await;
    assert!(matches!(late, Err(AppError::ValidationError(_))));
    let twice = fx
        .shifts()
        .end_shift(&fx.cashier, shift.id, EndShiftRequest { closing_cash: 49_000 })
        .await;
    assert!(matches!(twice, Err(AppError::ValidationError(_))));

    let expenses = fx.shifts().list_expenses(&fx.cashier, shift.id).await.unwrap();
    assert_eq!(expenses.len(), 1);
}

#[tokio::test]
async fn end_shift_counts_cash_change_and_expenses() {
    let fx = setup().await;
    let shift = fx.shifts().create_shift(&fx.cashier, open(50_000)).await.unwrap();

    // 现金 200.00 支付 115.00，找零 85.00
    let first = fx
        .orders()
        .create_order(&fx.cashier, fx.order_request(Some(fx.table_id), 1))
        .await
        .unwrap();
    fx.payments()
        .pay_order(&fx.cashier, first.order_id, fx.cash(20_000))
        .await
        .unwrap();

    // 刷卡不进现金抽屉
    let second = fx
        .orders()
        .create_order(&fx.cashier, fx.order_request(None, 1))
        .await
        .unwrap();
    let mut card = fx.cash(11_500);
    card.payment_method = PaymentMethod::Card;
    fx.payments()
        .pay_order(&fx.cashier, second.order_id, card)
        .await
        .unwrap();

    fx.shifts()
        .create_expense(&fx.cashier, expense(shift.id, 2_500))
        .await
        .unwrap();

    let closed = fx
        .shifts()
        .end_shift(&fx.cashier, shift.id, EndShiftRequest { closing_cash: 58_000 })
        .await
        .unwrap();
    assert_eq!(closed.system_cash_total, Some(59_000));
    assert_eq!(closed.cash_difference, Some(-1_000));
    assert!(!closed.is_active);

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let query = ReportQuery {
        start_date: today.clone(),
        end_date: today,
    };
    let reports = ReportService::new(fx.pool.clone());
    assert!(matches!(
        reports.transaction_report(&fx.cashier, &query).await,
        Err(AppError::PermissionDenied)
    ));

    let report = reports.transaction_report(&fx.manager, &query).await.unwrap();
    assert_eq!(report.totals.order_count, 2);
    assert_eq!(report.totals.total_amount, 23_000);
    assert_eq!(report.totals.paid_amount, 31_500);
    assert_eq!(report.totals.change_amount, 8_500);
    assert_eq!(report.days.len(), 1);

    let cash = report
        .payment_methods
        .iter()
        .find(|m| m.payment_method == PaymentMethod::Cash)
        .unwrap();
    assert_eq!((cash.count, cash.amount), (1, 20_000));
    let card = report
        .payment_methods
        .iter()
        .find(|m| m.payment_method == PaymentMethod::Card)
        .unwrap();
    assert_eq!((card.count, card.amount), (1, 11_500));
}

fn raw_shift(fx: &Fixture, shift_end: Option<chrono::DateTime<Utc>>) -> shift_entity::ActiveModel {
    let now = Utc::now();
    shift_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        outlet_id: Set(fx.outlet_id),
        cashier_id: Set(fx.cashier.user_id),
        shift_start: Set(now),
        shift_end: Set(shift_end),
        initial_cash: Set(0),
        closing_cash: Set(shift_end.map(|_| 0)),
        system_cash_total: Set(shift_end.map(|_| 0)),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[tokio::test]
async fn database_rejects_second_open_shift_for_cashier() {
    let fx = setup().await;
    raw_shift(&fx, None).insert(&fx.pool).await.unwrap();

    // 绕过服务层的检查直接写库，唯一索引仍然拦住第二个未结束班次
    let err = raw_shift(&fx, None).insert(&fx.pool).await.unwrap_err();
    assert!(matches!(AppError::from(err), AppError::Conflict(_)));

    // 已结束的班次不受限制
    raw_shift(&fx, Some(Utc::now())).insert(&fx.pool).await.unwrap();
    raw_shift(&fx, Some(Utc::now())).insert(&fx.pool).await.unwrap();

    let result = fx.shifts().create_shift(&fx.cashier, open(1_000)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}
