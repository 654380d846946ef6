use crate::entities::{DiscountType, discount_entity as discount};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::utils::FULL_RATE_BP;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

fn validate_discount(req: &CreateDiscountRequest) -> AppResult<()> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError("Discount name is required".to_string()));
    }
    if req.value <= 0 {
        return Err(AppError::ValidationError("Discount value must be positive".to_string()));
    }
    if req.discount_type == DiscountType::Percentage && req.value > FULL_RATE_BP as i64 {
        return Err(AppError::ValidationError(
            "Percentage discount cannot exceed 100%".to_string(),
        ));
    }
    if let Some(end) = req.end_date
        && end < req.start_date
    {
        return Err(AppError::ValidationError(
            "end_date must not be before start_date".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct DiscountService {
    pool: DatabaseConnection,
}

impl DiscountService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_discount(
        &self,
        ctx: &AuthContext,
        req: CreateDiscountRequest,
    ) -> AppResult<DiscountResponse> {
        ctx.require_manager()?;
        validate_discount(&req)?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let created = discount::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(ctx.outlet_id),
            name: Set(req.name.trim().to_string()),
            discount_type: Set(req.discount_type),
            value: Set(req.value),
            is_member_only: Set(req.is_member_only.unwrap_or(false)),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "discounts",
            Some(created.id),
            format!("Created discount {}", created.name),
        )
        .await?;
        txn.commit().await?;
        Ok(created.into())
    }

    pub async fn list_discounts(&self, ctx: &AuthContext) -> AppResult<Vec<DiscountResponse>> {
        let rows = discount::Entity::find()
            .filter(discount::Column::OutletId.eq(ctx.outlet_id))
            .order_by_desc(discount::Column::StartDate)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(DiscountResponse::from).collect())
    }

    pub async fn get_discount(&self, ctx: &AuthContext, id: Uuid) -> AppResult<DiscountResponse> {
        discount::Entity::find_by_id(id)
            .filter(discount::Column::OutletId.eq(ctx.outlet_id))
            .one(&self.pool)
            .await?
            .map(DiscountResponse::from)
            .ok_or_else(|| AppError::NotFound("Discount not found".to_string()))
    }

    pub async fn delete_discount(&self, ctx: &AuthContext, id: Uuid) -> AppResult<()> {
        ctx.require_manager()?;
        let txn = self.pool.begin().await?;
        let existing = discount::Entity::find_by_id(id)
            .filter(discount::Column::OutletId.eq(ctx.outlet_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Discount not found".to_string()))?;
        let name = existing.name.clone();
        existing.delete(&txn).await?;
        record_activity(
            &txn,
            ctx.user_id,
            "delete",
            "discounts",
            Some(id),
            format!("Deleted discount {name}"),
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(discount_type: DiscountType, value: i64) -> CreateDiscountRequest {
        CreateDiscountRequest {
            name: "Happy hour".to_string(),
            discount_type,
            value,
            is_member_only: None,
            start_date: Utc::now(),
            end_date: None,
        }
    }

    #[test]
    fn test_percentage_is_capped_at_full_rate() {
        assert!(validate_discount(&request(DiscountType::Percentage, 1_000)).is_ok());
        assert!(validate_discount(&request(DiscountType::Percentage, 10_001)).is_err());
        assert!(validate_discount(&request(DiscountType::Fixed, 50_000)).is_ok());
        assert!(validate_discount(&request(DiscountType::Fixed, 0)).is_err());
    }

    #[test]
    fn test_end_date_before_start_is_rejected() {
        let mut req = request(DiscountType::Fixed, 500);
        req.end_date = Some(req.start_date - chrono::Duration::days(1));
        assert!(validate_discount(&req).is_err());
    }
}
