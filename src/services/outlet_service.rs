use crate::entities::outlet_entity as outlet;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::utils::validate_outlet_code;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

#[derive(Clone)]
pub struct OutletService {
    pool: DatabaseConnection,
}

impl OutletService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_outlet(
        &self,
        ctx: &AuthContext,
        req: CreateOutletRequest,
    ) -> AppResult<OutletResponse> {
        ctx.require_admin()?;
        validate_outlet_code(&req.outlet_code)?;
        if req.name.trim().is_empty() {
            return Err(AppError::ValidationError("Outlet name is required".to_string()));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let created = outlet::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name.trim().to_string()),
            address: Set(req.address),
            phone: Set(req.phone),
            logo_url: Set(req.logo_url),
            outlet_code: Set(req.outlet_code),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "outlets",
            Some(created.id),
            format!("Created outlet {}", created.outlet_code),
        )
        .await?;
        txn.commit().await?;

        log::info!("Outlet created: code={}", created.outlet_code);
        Ok(created.into())
    }

    pub async fn current(&self, ctx: &AuthContext) -> AppResult<OutletResponse> {
        outlet::Entity::find_by_id(ctx.outlet_id)
            .one(&self.pool)
            .await?
            .map(OutletResponse::from)
            .ok_or_else(|| AppError::NotFound("Outlet not found".to_string()))
    }
}
