use crate::models::*;
use crate::services::{CustomerService, DiscountService, LoyaltyService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customer",
    request_body = CreateCustomerRequest,
    security(("bearer_auth" = [])),
    responses((status = 200, description = "会员登记成功", body = CustomerResponse))
)]
pub async fn create_customer(
    customer_service: web::Data<CustomerService>,
    auth: AuthContext,
    request: web::Json<CreateCustomerRequest>,
) -> Result<HttpResponse> {
    match customer_service.create_customer(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customer",
    params(
        ("page" = Option<u64>, Query, description = "页码"),
        ("per_page" = Option<u64>, Query, description = "每页数量"),
        ("search" = Option<String>, Query, description = "姓名、电话或会员号")
    ),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取会员列表成功"))
)]
pub async fn list_customers(
    customer_service: web::Data<CustomerService>,
    auth: AuthContext,
    query: web::Query<CustomerQuery>,
) -> Result<HttpResponse> {
    match customer_service.list_customers(&auth, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customer",
    params(("id" = Uuid, Path, description = "会员ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取会员成功", body = CustomerResponse),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn get_customer(
    customer_service: web::Data<CustomerService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match customer_service.get_customer(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customer",
    params(("id" = Uuid, Path, description = "会员ID")),
    request_body = UpdateCustomerRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新会员成功", body = CustomerResponse),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn update_customer(
    customer_service: web::Data<CustomerService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateCustomerRequest>,
) -> Result<HttpResponse> {
    match customer_service
        .update_customer(&auth, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/customers/{id}/loyalty-transactions",
    tag = "customer",
    params(("id" = Uuid, Path, description = "会员ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取积分流水成功", body = Vec<LoyaltyTransactionResponse>))
)]
pub async fn customer_loyalty_transactions(
    loyalty_service: web::Data<LoyaltyService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match loyalty_service.customer_transactions(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/discounts",
    tag = "customer",
    request_body = CreateDiscountRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建折扣成功", body = DiscountResponse),
        (status = 400, description = "折扣参数错误")
    )
)]
pub async fn create_discount(
    discount_service: web::Data<DiscountService>,
    auth: AuthContext,
    request: web::Json<CreateDiscountRequest>,
) -> Result<HttpResponse> {
    match discount_service.create_discount(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/discounts",
    tag = "customer",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取折扣列表成功", body = Vec<DiscountResponse>))
)]
pub async fn list_discounts(
    discount_service: web::Data<DiscountService>,
    auth: AuthContext,
) -> Result<HttpResponse> {
    match discount_service.list_discounts(&auth).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/discounts/{id}",
    tag = "customer",
    params(("id" = Uuid, Path, description = "折扣ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取折扣成功", body = DiscountResponse),
        (status = 404, description = "折扣不存在")
    )
)]
pub async fn get_discount(
    discount_service: web::Data<DiscountService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match discount_service.get_discount(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/discounts/{id}",
    tag = "customer",
    params(("id" = Uuid, Path, description = "折扣ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除折扣成功"),
        (status = 404, description = "折扣不存在")
    )
)]
pub async fn delete_discount(
    discount_service: web::Data<DiscountService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match discount_service.delete_discount(&auth, id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            id,
            "Discount deleted".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/loyalty-rewards",
    tag = "customer",
    request_body = CreateRewardRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建积分奖励成功", body = RewardResponse),
        (status = 400, description = "奖励参数错误")
    )
)]
pub async fn create_reward(
    loyalty_service: web::Data<LoyaltyService>,
    auth: AuthContext,
    request: web::Json<CreateRewardRequest>,
) -> Result<HttpResponse> {
    match loyalty_service.create_reward(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/loyalty-rewards",
    tag = "customer",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取积分奖励列表成功", body = Vec<RewardResponse>))
)]
pub async fn list_rewards(
    loyalty_service: web::Data<LoyaltyService>,
    auth: AuthContext,
) -> Result<HttpResponse> {
    match loyalty_service.list_rewards(&auth).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/loyalty-rewards/{id}",
    tag = "customer",
    params(("id" = Uuid, Path, description = "奖励ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取积分奖励成功", body = RewardResponse),
        (status = 404, description = "奖励不存在")
    )
)]
pub async fn get_reward(
    loyalty_service: web::Data<LoyaltyService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match loyalty_service.get_reward(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/loyalty-rewards/{id}",
    tag = "customer",
    params(("id" = Uuid, Path, description = "奖励ID")),
    request_body = UpdateRewardRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新积分奖励成功", body = RewardResponse),
        (status = 404, description = "奖励不存在")
    )
)]
pub async fn update_reward(
    loyalty_service: web::Data<LoyaltyService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateRewardRequest>,
) -> Result<HttpResponse> {
    match loyalty_service
        .update_reward(&auth, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn customer_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::post().to(create_customer))
            .route("", web::get().to(list_customers))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer))
            .route(
                "/{id}/loyalty-transactions",
                web::get().to(customer_loyalty_transactions),
            ),
    )
    .service(
        web::scope("/discounts")
            .route("", web::post().to(create_discount))
            .route("", web::get().to(list_discounts))
            .route("/{id}", web::get().to(get_discount))
            .route("/{id}", web::delete().to(delete_discount)),
    )
    .service(
        web::scope("/loyalty-rewards")
            .route("", web::post().to(create_reward))
            .route("", web::get().to(list_rewards))
            .route("/{id}", web::get().to(get_reward))
            .route("/{id}", web::put().to(update_reward)),
    );
}
