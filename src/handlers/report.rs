use crate::models::*;
use crate::services::ReportService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/reports/transactions",
    tag = "report",
    params(
        ("start_date" = String, Query, description = "开始日期 YYYY-MM-DD"),
        ("end_date" = String, Query, description = "结束日期 YYYY-MM-DD")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取交易报表成功", body = TransactionReport),
        (status = 400, description = "日期格式错误"),
        (status = 403, description = "权限不足")
    )
)]
pub async fn transaction_report(
    report_service: web::Data<ReportService>,
    auth: AuthContext,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    match report_service.transaction_report(&auth, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn report_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/reports").route("/transactions", web::get().to(transaction_report)));
}
