use crate::entities::PaymentMethod;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportQuery {
    #[schema(example = "2025-01-01")]
    pub start_date: String,
    #[schema(example = "2025-01-31")]
    pub end_date: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportTotals {
    pub order_count: u64,
    pub subtotal: i64,
    pub discount_amount: i64,
    pub tax_amount: i64,
    pub total_amount: i64,
    pub paid_amount: i64,
    pub change_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MethodTotal {
    pub payment_method: PaymentMethod,
    pub count: u64,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyReport {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: ReportTotals,
    pub payment_methods: Vec<MethodTotal>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<DailyReport>,
    pub totals: ReportTotals,
    pub payment_methods: Vec<MethodTotal>,
}
