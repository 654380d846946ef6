use crate::entities::{UserRole, user_entity};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BootstrapRequest {
    #[schema(example = "Central Kitchen")]
    pub outlet_name: String,
    #[schema(example = "JKT01")]
    pub outlet_code: String,
    pub outlet_address: Option<String>,
    #[schema(example = "admin")]
    pub username: String,
    pub email: Option<String>,
    #[schema(example = "admin12345")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "cashier01")]
    pub username: String,
    #[schema(example = "cashier123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// 仅 admin 可指定其他门店
    pub outlet_id: Option<Uuid>,
    #[schema(example = "cashier01")]
    pub username: String,
    pub email: Option<String>,
    #[schema(example = "cashier123")]
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub outlet_id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<user_entity::Model> for UserResponse {
    fn from(m: user_entity::Model) -> Self {
        Self {
            id: m.id,
            outlet_id: m.outlet_id,
            username: m.username,
            email: m.email,
            role: m.role,
            created_at: m.created_at,
        }
    }
}

/// 经过认证的调用者身份，由认证中间件写入请求扩展并显式传入各服务
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub outlet_id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl AuthContext {
    /// admin / manager 才能执行的管理操作
    pub fn require_manager(&self) -> AppResult<()> {
        if self.role.can_manage() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}
