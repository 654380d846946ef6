mod common;

use common::test_pool;
use pos_backend::AppError;
use pos_backend::entities::UserRole;
use pos_backend::models::*;
use pos_backend::services::{AuthService, UserService};
use pos_backend::utils::JwtService;

fn auth_service(pool: &sea_orm::DatabaseConnection) -> AuthService {
    AuthService::new(pool.clone(), JwtService::new("test-secret", 900, 86_400))
}

fn bootstrap_request() -> BootstrapRequest {
    BootstrapRequest {
        outlet_name: "Main Street".to_string(),
        outlet_code: "MS01".to_string(),
        outlet_address: None,
        username: "owner".to_string(),
        email: None,
        password: "owner1234".to_string(),
    }
}

#[tokio::test]
async fn bootstrap_login_and_refresh() {
    let pool = test_pool().await;
    let auth = auth_service(&pool);

    let first = auth.bootstrap(bootstrap_request()).await.unwrap();
    assert_eq!(first.user.role, UserRole::Admin);
    assert_eq!(first.token_type, "Bearer");

    let again = auth.bootstrap(bootstrap_request()).await;
    assert!(matches!(again, Err(AppError::Forbidden(_))));

    let bad = auth
        .login(LoginRequest {
            username: "owner".to_string(),
            password: "wrong-pass1".to_string(),
        })
        .await;
    assert!(matches!(bad, Err(AppError::AuthError(_))));

    let logged_in = auth
        .login(LoginRequest {
            username: "owner".to_string(),
            password: "owner1234".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(logged_in.user.id, first.user.id);

    let refreshed = auth
        .refresh_token(RefreshTokenRequest {
            refresh_token: logged_in.refresh_token.clone(),
        })
        .await
        .unwrap();
    assert_eq!(refreshed.user.id, first.user.id);

    // access token 不能用于刷新
    let misuse = auth
        .refresh_token(RefreshTokenRequest {
            refresh_token: logged_in.access_token,
        })
        .await;
    assert!(misuse.is_err());
}

#[tokio::test]
async fn managers_cannot_create_admins() {
    let pool = test_pool().await;
    let admin_tokens = auth_service(&pool).bootstrap(bootstrap_request()).await.unwrap();
    let admin = AuthContext {
        user_id: admin_tokens.user.id,
        outlet_id: admin_tokens.user.outlet_id,
        username: admin_tokens.user.username.clone(),
        role: UserRole::Admin,
    };
    let users = UserService::new(pool.clone());

    let manager = users
        .create_user(
            &admin,
            CreateUserRequest {
                outlet_id: None,
                username: "manager01".to_string(),
                email: None,
                password: "manager123".to_string(),
                role: UserRole::Manager,
            },
        )
        .await
        .unwrap();
    let manager_ctx = AuthContext {
        user_id: manager.id,
        outlet_id: manager.outlet_id,
        username: manager.username.clone(),
        role: UserRole::Manager,
    };

    let escalate = users
        .create_user(
            &manager_ctx,
            CreateUserRequest {
                outlet_id: None,
                username: "sneaky".to_string(),
                email: None,
                password: "sneaky123".to_string(),
                role: UserRole::Admin,
            },
        )
        .await;
    assert!(matches!(escalate, Err(AppError::Forbidden(_))));

    let cashier = users
        .create_user(
            &manager_ctx,
            CreateUserRequest {
                outlet_id: None,
                username: "cashier01".to_string(),
                email: None,
                password: "cashier123".to_string(),
                role: UserRole::Cashier,
            },
        )
        .await
        .unwrap();
    assert_eq!(cashier.outlet_id, admin.outlet_id);

    let me = users.me(&manager_ctx).await.unwrap();
    assert_eq!(me.username, "manager01");
}
