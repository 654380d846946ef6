use crate::entities::{UserRole, outlet_entity as outlet, user_entity as user};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::activity_log_service::record_activity;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    fn issue_tokens(&self, u: user::Model) -> AppResult<TokenResponse> {
        let subject = TokenSubject {
            user_id: u.id,
            outlet_id: u.outlet_id,
            username: &u.username,
            role: u.role,
        };
        let access_token = self.jwt_service.generate_access_token(&subject)?;
        let refresh_token = self.jwt_service.generate_refresh_token(&subject)?;
        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: UserResponse::from(u),
        })
    }

    /// 系统首次启动：创建第一个门店和管理员，已有用户时拒绝
    pub async fn bootstrap(&self, req: BootstrapRequest) -> AppResult<TokenResponse> {
        validate_outlet_code(&req.outlet_code)?;
        validate_password(&req.password)?;
        if req.outlet_name.trim().is_empty() || req.username.trim().is_empty() {
            return Err(AppError::ValidationError(
                "outlet_name and username are required".to_string(),
            ));
        }
        let password_hash = hash_password(&req.password)?;

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        if user::Entity::find().count(&txn).await? > 0 {
            return Err(AppError::Forbidden("System is already initialized".to_string()));
        }

        let created_outlet = outlet::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.outlet_name.trim().to_string()),
            address: Set(req.outlet_address),
            phone: Set(None),
            logo_url: Set(None),
            outlet_code: Set(req.outlet_code),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let admin = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            outlet_id: Set(created_outlet.id),
            username: Set(req.username.trim().to_string()),
            email: Set(req.email),
            password_hash: Set(password_hash),
            role: Set(UserRole::Admin),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        record_activity(
            &txn,
            admin.id,
            "bootstrap",
            "outlets",
            Some(created_outlet.id),
            format!("Initialized outlet {}", created_outlet.outlet_code),
        )
        .await?;
        txn.commit().await?;

        log::info!(
            "System bootstrapped: outlet={} admin={}",
            created_outlet.outlet_code,
            admin.username
        );
        self.issue_tokens(admin)
    }

    pub async fn login(&self, req: LoginRequest) -> AppResult<TokenResponse> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(req.username.trim()))
            .one(&self.pool)
            .await?;

        let u = found.ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;
        if !verify_password(&req.password, &u.password_hash)? {
            log::warn!("Login failed: username={}", u.username);
            return Err(AppError::AuthError("Invalid username or password".to_string()));
        }

        log::info!("User logged in: username={} role={}", u.username, u.role);
        self.issue_tokens(u)
    }

    pub async fn refresh_token(&self, req: RefreshTokenRequest) -> AppResult<TokenResponse> {
        let claims = self.jwt_service.verify_refresh_token(&req.refresh_token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

        // 角色或门店可能已变更，以数据库为准重新签发
        let u = user::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User not found".to_string()))?;
        self.issue_tokens(u)
    }
}
