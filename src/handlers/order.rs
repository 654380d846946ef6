use crate::models::*;
use crate::services::{OrderService, PaymentService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    request_body = CreateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "下单成功", body = CreateOrderResponse),
        (status = 400, description = "行项目为空或库存不足"),
        (status = 404, description = "菜品不存在"),
        (status = 409, description = "桌台已被占用")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    auth: AuthContext,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service.create_order(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    params(
        ("page" = Option<u64>, Query, description = "页码"),
        ("per_page" = Option<u64>, Query, description = "每页数量"),
        ("status" = Option<String>, Query, description = "订单状态 pending/completed/canceled"),
        ("reference_number" = Option<String>, Query, description = "订单号"),
        ("customer_id" = Option<Uuid>, Query, description = "会员ID"),
        ("table_id" = Option<Uuid>, Query, description = "桌台ID"),
        ("start_date" = Option<String>, Query, description = "开始日期 YYYY-MM-DD"),
        ("end_date" = Option<String>, Query, description = "结束日期 YYYY-MM-DD")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取订单列表成功"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    auth: AuthContext,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    match order_service.list_orders(&auth, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "order",
    params(("id" = Uuid, Path, description = "订单ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取订单详情成功", body = OrderDetailResponse),
        (status = 404, description = "订单不存在")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match order_service.get_order(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/table/{table_id}",
    tag = "order",
    params(("table_id" = Uuid, Path, description = "桌台ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取桌台待支付订单成功", body = OrderDetailResponse),
        (status = 404, description = "桌台没有待支付订单")
    )
)]
pub async fn get_order_by_table(
    order_service: web::Data<OrderService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match order_service.get_order_by_table(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    tag = "order",
    params(("id" = Uuid, Path, description = "订单ID")),
    request_body = CancelOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "取消订单成功", body = OrderResponse),
        (status = 400, description = "订单不是待支付状态"),
        (status = 401, description = "密码错误")
    )
)]
pub async fn cancel_order(
    order_service: web::Data<OrderService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<CancelOrderRequest>,
) -> Result<HttpResponse> {
    match order_service
        .cancel_order(&auth, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            response,
            "Order canceled".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/{id}/pay",
    tag = "order",
    params(("id" = Uuid, Path, description = "订单ID")),
    request_body = PayOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "支付成功", body = PaymentResultResponse),
        (status = 400, description = "实收不足或积分不足"),
        (status = 404, description = "订单、折扣或奖励不存在"),
        (status = 409, description = "订单不是待支付状态")
    )
)]
pub async fn pay_order(
    payment_service: web::Data<PaymentService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<PayOrderRequest>,
) -> Result<HttpResponse> {
    match payment_service
        .pay_order(&auth, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/{id}/refund",
    tag = "order",
    params(("id" = Uuid, Path, description = "订单ID")),
    request_body = RefundRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "退款成功", body = RefundResponse),
        (status = 400, description = "退款金额超过支付金额"),
        (status = 403, description = "权限不足"),
        (status = 409, description = "已退款")
    )
)]
pub async fn refund_order(
    payment_service: web::Data<PaymentService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<RefundRequest>,
) -> Result<HttpResponse> {
    match payment_service
        .refund_payment(&auth, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create_order))
            .route("", web::get().to(list_orders))
            .route("/table/{table_id}", web::get().to(get_order_by_table))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}/cancel", web::post().to(cancel_order))
            .route("/{id}/pay", web::post().to(pay_order))
            .route("/{id}/refund", web::post().to(refund_order)),
    );
}
