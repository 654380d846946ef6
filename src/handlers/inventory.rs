use crate::models::*;
use crate::services::InventoryService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/inventory-transactions",
    tag = "inventory",
    request_body = InventoryTransactionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "库存变动成功", body = InventoryTransactionResult),
        (status = 400, description = "库存不足或参数错误"),
        (status = 403, description = "权限不足")
    )
)]
pub async fn record_transaction(
    inventory_service: web::Data<InventoryService>,
    auth: AuthContext,
    request: web::Json<InventoryTransactionRequest>,
) -> Result<HttpResponse> {
    match inventory_service.record_transaction(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/inventories/transactions",
    tag = "inventory",
    params(
        ("page" = Option<u64>, Query, description = "页码"),
        ("per_page" = Option<u64>, Query, description = "每页数量"),
        ("ingredient_id" = Option<Uuid>, Query, description = "原料ID"),
        ("start_date" = Option<String>, Query, description = "开始日期 YYYY-MM-DD"),
        ("end_date" = Option<String>, Query, description = "结束日期 YYYY-MM-DD")
    ),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取库存流水成功"))
)]
pub async fn list_transactions(
    inventory_service: web::Data<InventoryService>,
    auth: AuthContext,
    query: web::Query<InventoryTransactionQuery>,
) -> Result<HttpResponse> {
    match inventory_service.list_transactions(&auth, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/inventories/transactions/{id}",
    tag = "inventory",
    params(("id" = Uuid, Path, description = "流水ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取库存流水成功", body = InventoryTransactionResponse),
        (status = 404, description = "流水不存在")
    )
)]
pub async fn get_transaction(
    inventory_service: web::Data<InventoryService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match inventory_service.get_transaction(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/inventories/low-stock",
    tag = "inventory",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取低库存原料成功", body = Vec<LowStockItem>))
)]
pub async fn low_stock(
    inventory_service: web::Data<InventoryService>,
    auth: AuthContext,
) -> Result<HttpResponse> {
    match inventory_service.low_stock(&auth).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn inventory_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/inventory-transactions").route("", web::post().to(record_transaction)))
        .service(
            web::scope("/inventories")
                .route("/transactions", web::get().to(list_transactions))
                .route("/transactions/{id}", web::get().to(get_transaction))
                .route("/low-stock", web::get().to(low_stock)),
        );
}
