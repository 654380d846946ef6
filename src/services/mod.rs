pub mod activity_log_service;
pub mod auth_service;
pub mod catalog_service;
pub mod customer_service;
pub mod discount_service;
pub mod inventory_service;
pub mod loyalty_service;
pub mod order_service;
pub mod outlet_service;
pub mod payment_service;
pub mod report_service;
pub mod sequence;
pub mod settlement;
pub mod shift_service;
pub mod tax_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use customer_service::CustomerService;
pub use discount_service::DiscountService;
pub use inventory_service::InventoryService;
pub use loyalty_service::LoyaltyService;
pub use order_service::OrderService;
pub use outlet_service::OutletService;
pub use payment_service::PaymentService;
pub use report_service::ReportService;
pub use shift_service::ShiftService;
pub use tax_service::TaxService;
pub use user_service::UserService;
