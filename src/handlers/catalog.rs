use crate::models::*;
use crate::services::{CatalogService, TaxService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/menu-categories",
    tag = "catalog",
    request_body = CreateCategoryRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建分类成功", body = CategoryResponse),
        (status = 403, description = "权限不足")
    )
)]
pub async fn create_category(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
    request: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse> {
    match catalog_service.create_category(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/menu-categories",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取分类列表成功", body = Vec<CategoryResponse>))
)]
pub async fn list_categories(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
) -> Result<HttpResponse> {
    match catalog_service.list_categories(&auth).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/menu-items",
    tag = "catalog",
    request_body = CreateMenuItemRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建菜品成功", body = MenuItemResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "权限不足")
    )
)]
pub async fn create_menu_item(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
    request: web::Json<CreateMenuItemRequest>,
) -> Result<HttpResponse> {
    match catalog_service.create_menu_item(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/menu-items/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "菜品ID")),
    request_body = UpdateMenuItemRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新菜品成功", body = MenuItemResponse),
        (status = 404, description = "菜品不存在")
    )
)]
pub async fn update_menu_item(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateMenuItemRequest>,
) -> Result<HttpResponse> {
    match catalog_service
        .update_menu_item(&auth, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/menu-items",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取菜品列表成功", body = Vec<MenuItemResponse>))
)]
pub async fn list_menu_items(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
) -> Result<HttpResponse> {
    match catalog_service.list_menu_items(&auth).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/menu-items/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "菜品ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取菜品成功", body = MenuItemResponse),
        (status = 404, description = "菜品不存在")
    )
)]
pub async fn get_menu_item(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match catalog_service.get_menu_item(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/menu-items/{id}/ingredients",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "菜品ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取配方成功", body = Vec<MenuIngredientResponse>))
)]
pub async fn list_menu_ingredients(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match catalog_service.list_menu_ingredients(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/menu-ingredients",
    tag = "catalog",
    request_body = UpsertMenuIngredientRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "保存配方成功", body = MenuIngredientResponse),
        (status = 404, description = "菜品或原料不存在")
    )
)]
pub async fn upsert_menu_ingredient(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
    request: web::Json<UpsertMenuIngredientRequest>,
) -> Result<HttpResponse> {
    match catalog_service.upsert_menu_ingredient(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/ingredients",
    tag = "catalog",
    request_body = CreateIngredientRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建原料成功", body = IngredientResponse),
        (status = 403, description = "权限不足")
    )
)]
pub async fn create_ingredient(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
    request: web::Json<CreateIngredientRequest>,
) -> Result<HttpResponse> {
    match catalog_service.create_ingredient(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/ingredients",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取原料列表成功", body = Vec<IngredientResponse>))
)]
pub async fn list_ingredients(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
) -> Result<HttpResponse> {
    match catalog_service.list_ingredients(&auth).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/tables",
    tag = "catalog",
    request_body = CreateTableRequest,
    security(("bearer_auth" = [])),
    responses((status = 200, description = "创建桌台成功", body = TableResponse))
)]
pub async fn create_table(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
    request: web::Json<CreateTableRequest>,
) -> Result<HttpResponse> {
    match catalog_service.create_table(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/tables",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取桌台列表成功", body = Vec<TableResponse>))
)]
pub async fn list_tables(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
) -> Result<HttpResponse> {
    match catalog_service.list_tables(&auth).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/tables/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "桌台ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "获取桌台成功", body = TableResponse),
        (status = 404, description = "桌台不存在")
    )
)]
pub async fn get_table(
    catalog_service: web::Data<CatalogService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match catalog_service.get_table(&auth, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/taxes",
    tag = "catalog",
    request_body = CreateTaxRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建税项成功", body = TaxResponse),
        (status = 400, description = "税率无效")
    )
)]
pub async fn create_tax(
    tax_service: web::Data<TaxService>,
    auth: AuthContext,
    request: web::Json<CreateTaxRequest>,
) -> Result<HttpResponse> {
    match tax_service.create_tax(&auth, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/taxes",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "获取税项列表成功", body = Vec<TaxResponse>))
)]
pub async fn list_taxes(tax_service: web::Data<TaxService>, auth: AuthContext) -> Result<HttpResponse> {
    match tax_service.list_taxes(&auth).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/taxes/{id}",
    tag = "catalog",
    params(("id" = Uuid, Path, description = "税项ID")),
    request_body = UpdateTaxRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新税项成功", body = TaxResponse),
        (status = 404, description = "税项不存在")
    )
)]
pub async fn update_tax(
    tax_service: web::Data<TaxService>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateTaxRequest>,
) -> Result<HttpResponse> {
    match tax_service
        .update_tax(&auth, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn catalog_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/menu-categories")
            .route("", web::post().to(create_category))
            .route("", web::get().to(list_categories)),
    )
    .service(
        web::scope("/menu-items")
            .route("", web::post().to(create_menu_item))
            .route("", web::get().to(list_menu_items))
            .route("/{id}", web::get().to(get_menu_item))
            .route("/{id}", web::put().to(update_menu_item))
            .route("/{id}/ingredients", web::get().to(list_menu_ingredients)),
    )
    .service(web::scope("/menu-ingredients").route("", web::post().to(upsert_menu_ingredient)))
    .service(
        web::scope("/ingredients")
            .route("", web::post().to(create_ingredient))
            .route("", web::get().to(list_ingredients)),
    )
    .service(
        web::scope("/tables")
            .route("", web::post().to(create_table))
            .route("", web::get().to(list_tables))
            .route("/{id}", web::get().to(get_table)),
    )
    .service(
        web::scope("/taxes")
            .route("", web::post().to(create_tax))
            .route("", web::get().to(list_taxes))
            .route("/{id}", web::put().to(update_tax)),
    );
}
