use crate::models::*;
use crate::services::ShiftService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/shifts",
    tag = "shift",
    request_body = CreateShiftRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "开班成功", body = ShiftResponse),
        (status = 409, description = "已有未结束的班次")
    )
)]
pub async fn create_shift(
    shift_service: web::Data<ShiftService>,
    auth: AuthContext,
    request: web::Json<CreateShiftRequest>,
) -> Result<HttpResponse> {
    match shift_service.create_shift(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/shifts/{id}/end",
    tag = "shift",
    params(("id" = Uuid, Path, description = "班次ID")),
    request_body = EndShiftRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "结班成功", body = ShiftResponse),
        (status = 400, description = "班次已结束"),
        (status = 403, description = "无权结束他人班次")
    )
)]
pub async fn end_shift(
    shift_service: web::Data<ShiftService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<EndShiftRequest>,
) -> Result<HttpResponse> {
    match shift_service
        .end_shift(&auth, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/shifts",
    tag = "shift",
    params(
        ("page" = Option<u64>, Query, description = "页码"),
        ("per_page" = Option<u64>, Query, description = "每页数量")
    ),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取班次列表成功"))
)]
pub async fn list_shifts(
    shift_service: web::Data<ShiftService>,
    auth: AuthContext,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match shift_service.list_shifts(&auth, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/shifts/{id}",
    tag = "shift",
    params(("id" = Uuid, Path, description = "班次ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取班次成功", body = ShiftResponse),
        (status = 404, description = "班次不存在")
    )
)]
pub async fn get_shift(
    shift_service: web::Data<ShiftService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match shift_service.get_shift(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/shifts/{id}/expenses",
    tag = "shift",
    params(("id" = Uuid, Path, description = "班次ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取班次支出成功", body = Vec<ExpenseResponse>))
)]
pub async fn list_expenses(
    shift_service: web::Data<ShiftService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match shift_service.list_expenses(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/expenses",
    tag = "shift",
    request_body = CreateExpenseRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "登记支出成功", body = ExpenseResponse),
        (status = 400, description = "班次已结束"),
        (status = 403, description = "不是本班次收银员")
    )
)]
pub async fn create_expense(
    shift_service: web::Data<ShiftService>,
    auth: AuthContext,
    request: web::Json<CreateExpenseRequest>,
) -> Result<HttpResponse> {
    match shift_service.create_expense(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/shifts/{id}/active",
    tag = "shift",
    params(("id" = Uuid, Path, description = "班次ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "班次是否进行中", body = bool),
        (status = 404, description = "班次不存在")
    )
)]
pub async fn shift_active(
    shift_service: web::Data<ShiftService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match shift_service.is_shift_active(&auth, path.into_inner()).await {
        Ok(active) => Ok(HttpResponse::Ok().json(ApiResponse::success(active))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn shift_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/shifts")
            .route("", web::post().to(create_shift))
            .route("", web::get().to(list_shifts))
            .route("/{id}", web::get().to(get_shift))
            .route("/{id}/active", web::get().to(shift_active))
            .route("/{id}/end", web::post().to(end_shift))
            .route("/{id}/expenses", web::get().to(list_expenses)),
    )
    .service(web::scope("/expenses").route("", web::post().to(create_expense)));
}
