use crate::models::*;
use crate::services::{AuthService, UserService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/auth/bootstrap",
    tag = "auth",
    request_body = BootstrapRequest,
    responses(
        (status = 200, description = "初始化成功", body = TokenResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "系统已初始化")
    )
)]
pub async fn bootstrap(
    auth_service: web::Data<AuthService>,
    request: web::Json<BootstrapRequest>,
) -> Result<HttpResponse> {
    match auth_service.bootstrap(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = TokenResponse),
        (status = 401, description = "认证失败")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "刷新令牌成功", body = TokenResponse),
        (status = 401, description = "无效的刷新令牌")
    )
)]
pub async fn refresh(
    auth_service: web::Data<AuthService>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse> {
    match auth_service.refresh_token(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "user",
    request_body = CreateUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建员工账号成功", body = UserResponse),
        (status = 403, description = "权限不足"),
        (status = 409, description = "用户名已存在")
    )
)]
pub async fn create_user(
    user_service: web::Data<UserService>,
    auth: AuthContext,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse> {
    match user_service.create_user(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "user",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取当前用户成功", body = UserResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn me(user_service: web::Data<UserService>, auth: AuthContext) -> Result<HttpResponse> {
    match user_service.me(&auth).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/bootstrap", web::post().to(bootstrap))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh)),
    )
    .service(
        web::scope("/users")
            .route("", web::post().to(create_user))
            .route("/me", web::get().to(me)),
    );
}
