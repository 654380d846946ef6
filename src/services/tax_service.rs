use crate::entities::{order_tax_entity as order_tax, tax_entity as tax};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::utils::{percent_of, validate_rate_bp};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

/// 单个税种在某笔订单上的计算结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxLine {
    pub tax_id: Uuid,
    pub rate_bp: i32,
    pub amount: i64,
}

/// 所有启用的税种都基于同一个小计计算，互不叠加
pub fn compute_tax_lines(subtotal: i64, taxes: &[tax::Model]) -> Vec<TaxLine> {
    taxes
        .iter()
        .filter(|t| t.is_active)
        .map(|t| TaxLine {
            tax_id: t.id,
            rate_bp: t.rate_bp,
            amount: percent_of(subtotal, t.rate_bp),
        })
        .collect()
}

/// 计算并写入订单税额行，返回税额合计
pub async fn apply_order_taxes<C: ConnectionTrait>(
    db: &C,
    order_id: Uuid,
    outlet_id: Uuid,
    subtotal: i64,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    let taxes = tax::Entity::find()
        .filter(tax::Column::OutletId.eq(outlet_id))
        .filter(tax::Column::IsActive.eq(true))
        .all(db)
        .await?;

    let lines = compute_tax_lines(subtotal, &taxes);
    let mut total_tax = 0i64;
    for line in &lines {
        order_tax::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            tax_id: Set(line.tax_id),
            rate_bp: Set(line.rate_bp),
            tax_amount: Set(line.amount),
            created_at: Set(now),
        }
        .insert(db)
        .await?;
        total_tax += line.amount;
    }
    Ok(total_tax)
}

#[derive(Clone)]
pub struct TaxService {
    pool: DatabaseConnection,
}

impl TaxService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_tax(&self, ctx: &AuthContext, req: CreateTaxRequest) -> AppResult<TaxResponse> {
        ctx.require_manager()?;
        validate_rate_bp(req.rate_bp)?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Tax name is required".to_string()));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let created = tax::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(ctx.outlet_id),
            name: Set(name.to_string()),
            rate_bp: Set(req.rate_bp),
            is_active: Set(req.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "taxes",
            Some(created.id),
            format!("Created tax {} ({} bp)", created.name, created.rate_bp),
        )
        .await?;
        txn.commit().await?;

        Ok(created.into())
    }

    pub async fn list_taxes(&self, ctx: &AuthContext) -> AppResult<Vec<TaxResponse>> {
        let rows = tax::Entity::find()
            .filter(tax::Column::OutletId.eq(ctx.outlet_id))
            .order_by_asc(tax::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(TaxResponse::from).collect())
    }

    /// 修改税率只影响之后创建的订单，已有订单的税额已固化在 order_taxes 中
    pub async fn update_tax(
        &self,
        ctx: &AuthContext,
        tax_id: Uuid,
        req: UpdateTaxRequest,
    ) -> AppResult<TaxResponse> {
        ctx.require_manager()?;
        let txn = self.pool.begin().await?;
        let existing = tax::Entity::find_by_id(tax_id)
            .filter(tax::Column::OutletId.eq(ctx.outlet_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Tax not found".to_string()))?;

        let mut active = existing.into_active_model();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(rate_bp) = req.rate_bp {
            validate_rate_bp(rate_bp)?;
            active.rate_bp = Set(rate_bp);
        }
        if let Some(is_active) = req.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        record_activity(
            &txn,
            ctx.user_id,
            "update",
            "taxes",
            Some(updated.id),
            format!("Updated tax {}", updated.name),
        )
        .await?;
        txn.commit().await?;

        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tax_row(rate_bp: i32, is_active: bool) -> tax::Model {
        let now = Utc::now();
        tax::Model {
            id: Uuid::new_v4(),
            outlet_id: Uuid::nil(),
            name: format!("tax-{rate_bp}"),
            rate_bp,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_two_taxes_on_100() {
        let taxes = vec![tax_row(1_000, true), tax_row(500, true)];
        let lines = compute_tax_lines(10_000, &taxes);
        let amounts: Vec<i64> = lines.iter().map(|l| l.amount).collect();
        assert_eq!(amounts, vec![1_000, 500]);
        assert_eq!(10_000 + amounts.iter().sum::<i64>(), 11_500);
    }

    #[test]
    fn test_inactive_tax_skipped() {
        let taxes = vec![tax_row(1_000, false), tax_row(250, true)];
        let lines = compute_tax_lines(9_999, &taxes);
        assert_eq!(lines.len(), 1);
        // 99.99 × 2.5% = 2.49975 -> 2.50
        assert_eq!(lines[0].amount, 250);
    }

    #[test]
    fn test_taxes_are_not_cascaded() {
        let a = vec![tax_row(1_000, true), tax_row(500, true)];
        let b = vec![tax_row(500, true), tax_row(1_000, true)];
        let sum = |v: Vec<TaxLine>| v.iter().map(|l| l.amount).sum::<i64>();
        assert_eq!(sum(compute_tax_lines(12_345, &a)), sum(compute_tax_lines(12_345, &b)));
    }
}
