use crate::entities::{
    PaymentMethod, PaymentStatus, order_entity as order, payment_entity as payment,
    payment_split_entity as payment_split,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::order_service::completed_orders_between;
use crate::utils::date_bounds;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

impl ReportTotals {
    fn add_order(&mut self, o: &order::Model) {
        self.order_count += 1;
        self.subtotal += o.subtotal;
        self.discount_amount += o.discount_amount;
        self.tax_amount += o.tax_amount;
        self.total_amount += o.total_amount;
        self.paid_amount += o.paid_amount;
        self.change_amount += o.change_amount;
    }
}

fn add_method(totals: &mut Vec<MethodTotal>, method: PaymentMethod, amount: i64) {
    match totals.iter_mut().find(|t| t.payment_method == method) {
        Some(t) => {
            t.count += 1;
            t.amount += amount;
        }
        None => totals.push(MethodTotal {
            payment_method: method,
            count: 1,
            amount,
        }),
    }
}

/// 按订单创建日期(UTC)汇总；splits 为每个订单已完成支付的分账
fn aggregate(
    orders: &[order::Model],
    splits: &HashMap<Uuid, Vec<payment_split::Model>>,
) -> (Vec<DailyReport>, ReportTotals, Vec<MethodTotal>) {
    let mut days: BTreeMap<NaiveDate, (ReportTotals, Vec<MethodTotal>)> = BTreeMap::new();
    let mut totals = ReportTotals::default();
    let mut methods = Vec::new();

    for o in orders {
        let day = days.entry(o.created_at.date_naive()).or_default();
        day.0.add_order(o);
        totals.add_order(o);
        for s in splits.get(&o.id).into_iter().flatten() {
            add_method(&mut day.1, s.payment_method, s.amount);
            add_method(&mut methods, s.payment_method, s.amount);
        }
    }

    let days = days
        .into_iter()
        .map(|(date, (totals, payment_methods))| DailyReport {
            date,
            totals,
            payment_methods,
        })
        .collect();
    (days, totals, methods)
}

#[derive(Clone)]
pub struct ReportService {
    pool: DatabaseConnection,
}

impl ReportService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn transaction_report(
        &self,
        ctx: &AuthContext,
        query: &ReportQuery,
    ) -> AppResult<TransactionReport> {
        ctx.require_manager()?;
        let (from, to) = date_bounds(Some(&query.start_date), Some(&query.end_date))?;
        let (Some(from), Some(to)) = (from, to) else {
            return Err(AppError::ValidationError(
                "start_date and end_date are required".to_string(),
            ));
        };

        let orders = completed_orders_between(&self.pool, ctx.outlet_id, from, to).await?;
        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

        let mut splits: HashMap<Uuid, Vec<payment_split::Model>> = HashMap::new();
        if !order_ids.is_empty() {
            let payments = payment::Entity::find()
                .filter(payment::Column::OrderId.is_in(order_ids))
                .filter(payment::Column::PaymentStatus.eq(PaymentStatus::Completed))
                .all(&self.pool)
                .await?;
            let order_of: HashMap<Uuid, Uuid> =
                payments.iter().map(|p| (p.id, p.order_id)).collect();
            if !order_of.is_empty() {
                let rows = payment_split::Entity::find()
                    .filter(payment_split::Column::PaymentId.is_in(order_of.keys().copied()))
                    .all(&self.pool)
                    .await?;
                for row in rows {
                    if let Some(order_id) = order_of.get(&row.payment_id) {
                        splits.entry(*order_id).or_default().push(row);
                    }
                }
            }
        }

        let (days, totals, payment_methods) = aggregate(&orders, &splits);
        log::info!(
            "Transaction report: outlet={} {}..{} orders={}",
            ctx.outlet_id,
            query.start_date,
            query.end_date,
            totals.order_count
        );
        Ok(TransactionReport {
            start_date: from.date_naive(),
            end_date: (to - chrono::Duration::days(1)).date_naive(),
            days,
            totals,
            payment_methods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{OrderStatus, OrderType, SplitStatus};
    use chrono::{TimeZone, Utc};

    fn completed_order(day: u32, total: i64, paid: i64) -> order::Model {
        let at = Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap();
        order::Model {
            id: Uuid::new_v4(),
            outlet_id: Uuid::nil(),
            table_id: None,
            customer_id: None,
            user_id: Uuid::nil(),
            status: OrderStatus::Completed,
            order_type: OrderType::DineIn,
            subtotal: total,
            discount_id: None,
            discount_amount: 0,
            tax_amount: 0,
            total_amount: total,
            paid_amount: paid,
            change_amount: paid - total,
            reference_number: format!("ODR-{day}-{total}"),
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn split(method: PaymentMethod, amount: i64) -> payment_split::Model {
        payment_split::Model {
            id: Uuid::new_v4(),
            payment_id: Uuid::nil(),
            amount,
            payment_method: method,
            status: SplitStatus::Completed,
            reference_number: None,
            user_id: Uuid::nil(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_aggregate_groups_by_day_and_method() {
        let a = completed_order(1, 10_000, 10_000);
        let b = completed_order(1, 5_000, 6_000);
        let c = completed_order(2, 7_000, 7_000);
        let mut splits = HashMap::new();
        splits.insert(a.id, vec![split(PaymentMethod::Card, 10_000)]);
        splits.insert(b.id, vec![split(PaymentMethod::Cash, 6_000)]);
        splits.insert(
            c.id,
            vec![split(PaymentMethod::Cash, 2_000), split(PaymentMethod::Qris, 5_000)],
        );

        let (days, totals, methods) = aggregate(&[a, b, c], &splits);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].totals.order_count, 2);
        assert_eq!(days[0].totals.total_amount, 15_000);
        assert_eq!(days[0].totals.change_amount, 1_000);
        assert_eq!(days[1].payment_methods.len(), 2);
        assert_eq!(totals.order_count, 3);
        assert_eq!(totals.paid_amount, 23_000);

        let cash = methods
            .iter()
            .find(|m| m.payment_method == PaymentMethod::Cash)
            .unwrap();
        assert_eq!((cash.count, cash.amount), (2, 8_000));
    }
}
