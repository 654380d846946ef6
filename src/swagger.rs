use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{
    DiscountType, InventoryTransactionType, LoyaltyTransactionType, MembershipStatus,
    OrderStatus, OrderType, PaymentMethod, PaymentStatus, RefundStatus, RewardType, SplitStatus,
    TableStatus, UserRole,
};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::bootstrap,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::create_user,
        handlers::auth::me,
        handlers::outlet::create_outlet,
        handlers::outlet::current_outlet,
        handlers::catalog::create_category,
        handlers::catalog::list_categories,
        handlers::catalog::create_menu_item,
        handlers::catalog::update_menu_item,
        handlers::catalog::list_menu_items,
        handlers::catalog::get_menu_item,
        handlers::catalog::list_menu_ingredients,
        handlers::catalog::upsert_menu_ingredient,
        handlers::catalog::create_ingredient,
        handlers::catalog::list_ingredients,
        handlers::catalog::create_table,
        handlers::catalog::list_tables,
        handlers::catalog::get_table,
        handlers::catalog::create_tax,
        handlers::catalog::list_taxes,
        handlers::catalog::update_tax,
        handlers::inventory::record_transaction,
        handlers::inventory::list_transactions,
        handlers::inventory::get_transaction,
        handlers::inventory::low_stock,
        handlers::order::create_order,
        handlers::order::list_orders,
        handlers::order::get_order,
        handlers::order::get_order_by_table,
        handlers::order::cancel_order,
        handlers::order::pay_order,
        handlers::order::refund_order,
        handlers::payment::list_payments,
        handlers::payment::get_payment,
        handlers::customer::create_customer,
        handlers::customer::list_customers,
        handlers::customer::get_customer,
        handlers::customer::update_customer,
        handlers::customer::customer_loyalty_transactions,
        handlers::customer::create_discount,
        handlers::customer::list_discounts,
        handlers::customer::get_discount,
        handlers::customer::delete_discount,
        handlers::customer::create_reward,
        handlers::customer::list_rewards,
        handlers::customer::get_reward,
        handlers::customer::update_reward,
        handlers::shift::create_shift,
        handlers::shift::end_shift,
        handlers::shift::list_shifts,
        handlers::shift::get_shift,
        handlers::shift::shift_active,
        handlers::shift::list_expenses,
        handlers::shift::create_expense,
        handlers::report::transaction_report,
    ),
    components(
        schemas(
            UserRole,
            OrderStatus,
            OrderType,
            TableStatus,
            InventoryTransactionType,
            PaymentMethod,
            PaymentStatus,
            SplitStatus,
            RefundStatus,
            DiscountType,
            RewardType,
            LoyaltyTransactionType,
            MembershipStatus,
            ApiError,
            PaginationParams,
            BootstrapRequest,
            LoginRequest,
            RefreshTokenRequest,
            TokenResponse,
            CreateUserRequest,
            UserResponse,
            CreateOutletRequest,
            OutletResponse,
            CreateCategoryRequest,
            CategoryResponse,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuItemResponse,
            CreateIngredientRequest,
            IngredientResponse,
            UpsertMenuIngredientRequest,
            MenuIngredientResponse,
            CreateTableRequest,
            TableResponse,
            CreateTaxRequest,
            UpdateTaxRequest,
            TaxResponse,
            InventoryTransactionRequest,
            InventorySnapshot,
            InventoryTransactionResponse,
            InventoryTransactionResult,
            LowStockItem,
            OrderItemRequest,
            CreateOrderRequest,
            CreateOrderResponse,
            CancelOrderRequest,
            OrderResponse,
            OrderItemResponse,
            OrderTaxResponse,
            OrderDetailResponse,
            PaymentSplitRequest,
            PayOrderRequest,
            PaymentResultResponse,
            RefundRequest,
            RefundResponse,
            PaymentResponse,
            PaymentSplitResponse,
            PaymentDetailResponse,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CustomerResponse,
            CreateDiscountRequest,
            DiscountResponse,
            CreateRewardRequest,
            UpdateRewardRequest,
            RewardResponse,
            LoyaltyTransactionResponse,
            CreateShiftRequest,
            EndShiftRequest,
            ShiftResponse,
            CreateExpenseRequest,
            ExpenseResponse,
            ReportTotals,
            MethodTotal,
            DailyReport,
            TransactionReport,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "user", description = "Staff account API"),
        (name = "outlet", description = "Outlet API"),
        (name = "catalog", description = "Menu, ingredient, table and tax API"),
        (name = "inventory", description = "Inventory ledger API"),
        (name = "order", description = "Order, payment and refund API"),
        (name = "payment", description = "Payment query API"),
        (name = "customer", description = "Customer, discount and loyalty API"),
        (name = "shift", description = "Shift and expense API"),
        (name = "report", description = "Reporting API"),
    ),
    info(
        title = "POS Backend API",
        version = "1.0.0",
        description = "Multi-outlet restaurant POS REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_has_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/orders/{id}/pay"));
    }
}
