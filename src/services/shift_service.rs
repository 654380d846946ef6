use crate::entities::{
    PaymentStatus, expense_entity as expense, order_entity as order, payment_entity as payment,
    payment_split_entity as payment_split, shift_entity as shift,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::services::payment_service::cash_portion;
use crate::utils::{format_cents, validate_amount};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

/// 班次期间抽屉里应有的现金
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CashTally {
    pub cash_received: i64,
    pub change_given: i64,
    pub expenses: i64,
}

impl CashTally {
    pub fn expected(&self, initial_cash: i64) -> i64 {
        initial_cash + self.cash_received - self.change_given - self.expenses
    }
}

/// 统计收银员在 [from, to] 内已完成支付的现金收入与找零，以及班次支出
async fn tally_cash<C: ConnectionTrait>(
    db: &C,
    current: &shift::Model,
    to: DateTime<Utc>,
) -> AppResult<CashTally> {
    let payments = payment::Entity::find()
        .filter(payment::Column::OutletId.eq(current.outlet_id))
        .filter(payment::Column::UserId.eq(current.cashier_id))
        .filter(payment::Column::PaymentStatus.eq(PaymentStatus::Completed))
        .filter(payment::Column::PaymentDate.gte(current.shift_start))
        .filter(payment::Column::PaymentDate.lte(to))
        .all(db)
        .await?;

    let mut tally = CashTally::default();
    for p in payments {
        let splits = payment_split::Entity::find()
            .filter(payment_split::Column::PaymentId.eq(p.id))
            .all(db)
            .await?;
        let cash = cash_portion(&splits);
        if cash > 0 {
            tally.cash_received += cash;
            // 找零从现金抽屉付出
            tally.change_given += order::Entity::find_by_id(p.order_id)
                .one(db)
                .await?
                .map_or(0, |o| o.change_amount);
        }
    }

    tally.expenses = expense::Entity::find()
        .filter(expense::Column::ShiftId.eq(current.id))
        .all(db)
        .await?
        .iter()
        .map(|e| e.amount)
        .sum();
    Ok(tally)
}

async fn find_shift<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    shift_id: Uuid,
) -> AppResult<shift::Model> {
    shift::Entity::find_by_id(shift_id)
        .filter(shift::Column::OutletId.eq(ctx.outlet_id))
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))
}

#[derive(Clone)]
pub struct ShiftService {
    pool: DatabaseConnection,
}

impl ShiftService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 为当前收银员开班；同一门店同时只能有一个未结束的班次
    pub async fn create_shift(
        &self,
        ctx: &AuthContext,
        req: CreateShiftRequest,
    ) -> AppResult<ShiftResponse> {
        validate_amount(req.initial_cash, "initial_cash")?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let open = shift::Entity::find()
            .filter(shift::Column::OutletId.eq(ctx.outlet_id))
            .filter(shift::Column::CashierId.eq(ctx.user_id))
            .filter(shift::Column::ShiftEnd.is_null())
            .one(&txn)
            .await?;
        // 并发开班由 uq_shifts_open_per_cashier 唯一索引兜底，冲突映射为 Conflict
        if let Some(open) = open {
            return Err(AppError::Conflict(format!(
                "Cashier already has an open shift {}",
                open.id
            )));
        }

        let created = shift::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(ctx.outlet_id),
            cashier_id: Set(ctx.user_id),
            shift_start: Set(req.shift_start.unwrap_or(now)),
            shift_end: Set(None),
            initial_cash: Set(req.initial_cash),
            closing_cash: Set(None),
            system_cash_total: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "shifts",
            Some(created.id),
            format!("Opened shift with {}", format_cents(req.initial_cash)),
        )
        .await?;
        txn.commit().await?;

        log::info!("Shift opened: id={} cashier={}", created.id, ctx.username);
        Ok(created.into())
    }

    /// 结班并计算系统现金；只有班次本人或管理员可以结班
    pub async fn end_shift(
        &self,
        ctx: &AuthContext,
        shift_id: Uuid,
        req: EndShiftRequest,
    ) -> AppResult<ShiftResponse> {
        validate_amount(req.closing_cash, "closing_cash")?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let current = find_shift(&txn, ctx, shift_id).await?;
        if current.cashier_id != ctx.user_id && !ctx.role.can_manage() {
            return Err(AppError::Forbidden(
                "Only the shift's cashier or a manager can end it".to_string(),
            ));
        }
        if !current.is_active() {
            return Err(AppError::ValidationError("Shift has already ended".to_string()));
        }

        let tally = tally_cash(&txn, &current, now).await?;
        let system_cash_total = tally.expected(current.initial_cash);

        let mut active = current.into_active_model();
        active.shift_end = Set(Some(now));
        active.closing_cash = Set(Some(req.closing_cash));
        active.system_cash_total = Set(Some(system_cash_total));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        record_activity(
            &txn,
            ctx.user_id,
            "end",
            "shifts",
            Some(updated.id),
            format!(
                "Closed shift: counted {} expected {}",
                format_cents(req.closing_cash),
                format_cents(system_cash_total)
            ),
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "Shift closed: id={} closing={} system={} difference={}",
            updated.id,
            req.closing_cash,
            system_cash_total,
            req.closing_cash - system_cash_total
        );
        Ok(updated.into())
    }

    pub async fn is_shift_active(&self, ctx: &AuthContext, shift_id: Uuid) -> AppResult<bool> {
        let row = shift::Entity::find_by_id(shift_id)
            .filter(shift::Column::OutletId.eq(ctx.outlet_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;
        Ok(row.is_active())
    }

    pub async fn list_shifts(
        &self,
        ctx: &AuthContext,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<ShiftResponse>> {
        let select = shift::Entity::find().filter(shift::Column::OutletId.eq(ctx.outlet_id));
        let total = select.clone().count(&self.pool).await?;
        let rows = select
            .order_by_desc(shift::Column::ShiftStart)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?;
        Ok(PaginatedResponse::new(
            rows.into_iter().map(ShiftResponse::from).collect(),
            params,
            total,
        ))
    }

    pub async fn get_shift(&self, ctx: &AuthContext, shift_id: Uuid) -> AppResult<ShiftResponse> {
        shift::Entity::find_by_id(shift_id)
            .filter(shift::Column::OutletId.eq(ctx.outlet_id))
            .one(&self.pool)
            .await?
            .map(ShiftResponse::from)
            .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))
    }

    /// 支出只能由班次本人在班次进行中登记
    pub async fn create_expense(
        &self,
        ctx: &AuthContext,
        req: CreateExpenseRequest,
    ) -> AppResult<ExpenseResponse> {
        if req.description.trim().is_empty() {
            return Err(AppError::ValidationError("Description is required".to_string()));
        }
        if req.amount <= 0 {
            return Err(AppError::ValidationError("amount must be positive".to_string()));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let current = find_shift(&txn, ctx, req.shift_id).await?;
        if current.cashier_id != ctx.user_id {
            return Err(AppError::Forbidden(
                "Expenses can only be recorded by the shift's cashier".to_string(),
            ));
        }
        if !current.is_active() {
            return Err(AppError::ValidationError("Shift has already ended".to_string()));
        }

        let created = expense::ActiveModel {
            id: Set(Uuid::new_v4()),
            shift_id: Set(current.id),
            description: Set(req.description.trim().to_string()),
            amount: Set(req.amount),
            created_by: Set(ctx.user_id),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;
        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "expenses",
            Some(created.id),
            format!("Expense {}: {}", created.description, format_cents(created.amount)),
        )
        .await?;
        txn.commit().await?;
        Ok(created.into())
    }

    pub async fn list_expenses(
        &self,
        ctx: &AuthContext,
        shift_id: Uuid,
    ) -> AppResult<Vec<ExpenseResponse>> {
        self.get_shift(ctx, shift_id).await?;
        let rows = expense::Entity::find()
            .filter(expense::Column::ShiftId.eq(shift_id))
            .order_by_asc(expense::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ExpenseResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_cash() {
        let tally = CashTally {
            cash_received: 20_000,
            change_given: 1_500,
            expenses: 2_500,
        };
        assert_eq!(tally.expected(50_000), 66_000);
        assert_eq!(CashTally::default().expected(50_000), 50_000);
    }
}
