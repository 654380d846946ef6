use crate::models::*;
use crate::services::PaymentService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/payments",
    tag = "payment",
    params(
        ("page" = Option<u64>, Query, description = "页码"),
        ("per_page" = Option<u64>, Query, description = "每页数量"),
        ("payment_status" = Option<String>, Query, description = "支付状态 completed/refunded"),
        ("start_date" = Option<String>, Query, description = "开始日期 YYYY-MM-DD"),
        ("end_date" = Option<String>, Query, description = "结束日期 YYYY-MM-DD")
    ),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取支付列表成功"))
)]
pub async fn list_payments(
    payment_service: web::Data<PaymentService>,
    auth: AuthContext,
    query: web::Query<PaymentQuery>,
) -> Result<HttpResponse> {
    match payment_service.list_payments(&auth, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "payment",
    params(("id" = Uuid, Path, description = "支付ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取支付详情成功", body = PaymentDetailResponse),
        (status = 404, description = "支付不存在")
    )
)]
pub async fn get_payment(
    payment_service: web::Data<PaymentService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match payment_service.get_payment(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(list_payments))
            .route("/{id}", web::get().to(get_payment)),
    );
}
