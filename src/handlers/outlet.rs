use crate::models::*;
use crate::services::OutletService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/outlets",
    tag = "outlet",
    request_body = CreateOutletRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建门店成功", body = OutletResponse),
        (status = 403, description = "仅管理员可操作"),
        (status = 409, description = "门店编码已存在")
    )
)]
pub async fn create_outlet(
    outlet_service: web::Data<OutletService>,
    auth: AuthContext,
    request: web::Json<CreateOutletRequest>,
) -> Result<HttpResponse> {
    match outlet_service.create_outlet(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/outlets/current",
    tag = "outlet",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取当前门店成功", body = OutletResponse)
    )
)]
pub async fn current_outlet(
    outlet_service: web::Data<OutletService>,
    auth: AuthContext,
) -> Result<HttpResponse> {
    match outlet_service.current(&auth).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn outlet_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/outlets")
            .route("", web::post().to(create_outlet))
            .route("/current", web::get().to(current_outlet)),
    );
}
