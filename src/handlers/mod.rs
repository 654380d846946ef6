pub mod auth;
pub mod catalog;
pub mod customer;
pub mod inventory;
pub mod order;
pub mod outlet;
pub mod payment;
pub mod report;
pub mod shift;

pub use auth::auth_config;
pub use catalog::catalog_config;
pub use customer::customer_config;
pub use inventory::inventory_config;
pub use order::order_config;
pub use outlet::outlet_config;
pub use payment::payment_config;
pub use report::report_config;
pub use shift::shift_config;
