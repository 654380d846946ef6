use crate::entities::{expense_entity, shift_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateShiftRequest {
    /// 缺省为当前时间
    pub shift_start: Option<DateTime<Utc>>,
    #[schema(example = 50000)]
    pub initial_cash: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EndShiftRequest {
    #[schema(example = 125000)]
    pub closing_cash: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShiftResponse {
    pub id: Uuid,
    pub cashier_id: Uuid,
    pub shift_start: DateTime<Utc>,
    pub shift_end: Option<DateTime<Utc>>,
    pub initial_cash: i64,
    pub closing_cash: Option<i64>,
    pub system_cash_total: Option<i64>,
    /// closing_cash - system_cash_total
    pub cash_difference: Option<i64>,
    pub is_active: bool,
}

impl From<shift_entity::Model> for ShiftResponse {
    fn from(m: shift_entity::Model) -> Self {
        let cash_difference = m
            .closing_cash
            .zip(m.system_cash_total)
            .map(|(closing, system)| closing - system);
        Self {
            id: m.id,
            cashier_id: m.cashier_id,
            shift_start: m.shift_start,
            shift_end: m.shift_end,
            initial_cash: m.initial_cash,
            closing_cash: m.closing_cash,
            system_cash_total: m.system_cash_total,
            cash_difference,
            is_active: m.shift_end.is_none(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateExpenseRequest {
    pub shift_id: Uuid,
    #[schema(example = "Ice delivery")]
    pub description: String,
    #[schema(example = 2500)]
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub shift_id: Uuid,
    pub description: String,
    pub amount: i64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<expense_entity::Model> for ExpenseResponse {
    fn from(m: expense_entity::Model) -> Self {
        Self {
            id: m.id,
            shift_id: m.shift_id,
            description: m.description,
            amount: m.amount,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}
