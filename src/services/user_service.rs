use crate::entities::{UserRole, outlet_entity as outlet, user_entity as user};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::utils::{hash_password, validate_password};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// admin 可在任意门店建任意角色；manager 只能在本门店建非 admin 账号
    pub async fn create_user(
        &self,
        ctx: &AuthContext,
        req: CreateUserRequest,
    ) -> AppResult<UserResponse> {
        ctx.require_manager()?;
        let outlet_id = match ctx.role {
            UserRole::Admin => req.outlet_id.unwrap_or(ctx.outlet_id),
            _ => {
                if req.role == UserRole::Admin {
                    return Err(AppError::Forbidden(
                        "Managers cannot create admin accounts".to_string(),
                    ));
                }
                if req.outlet_id.is_some_and(|id| id != ctx.outlet_id) {
                    return Err(AppError::Forbidden(
                        "Managers can only create staff for their own outlet".to_string(),
                    ));
                }
                ctx.outlet_id
            }
        };

        let username = req.username.trim().to_string();
        if username.len() < 3 {
            return Err(AppError::ValidationError(
                "Username must be at least 3 characters".to_string(),
            ));
        }
        validate_password(&req.password)?;
        let password_hash = hash_password(&req.password)?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        outlet::Entity::find_by_id(outlet_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Outlet not found".to_string()))?;

        // 用户名唯一约束冲突映射为 Conflict
        let created = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(outlet_id),
            username: Set(username),
            email: Set(req.email),
            password_hash: Set(password_hash),
            role: Set(req.role),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        record_activity(
            &txn,
            ctx.user_id,
            "create",
            "users",
            Some(created.id),
            format!("Created {} account {}", created.role, created.username),
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "User created: username={} role={} by={}",
            created.username,
            created.role,
            ctx.username
        );
        Ok(created.into())
    }

    pub async fn me(&self, ctx: &AuthContext) -> AppResult<UserResponse> {
        user::Entity::find_by_id(ctx.user_id)
            .one(&self.pool)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
