pub mod activity_logs;
pub mod customer_points;
pub mod customers;
pub mod discounts;
pub mod enums;
pub mod expenses;
pub mod ingredients;
pub mod inventories;
pub mod inventory_transactions;
pub mod loyalty_rewards;
pub mod loyalty_transactions;
pub mod menu_categories;
pub mod menu_ingredients;
pub mod menu_items;
pub mod order_items;
pub mod order_taxes;
pub mod orders;
pub mod outlets;
pub mod payment_splits;
pub mod payments;
pub mod refunds;
pub mod sequence_counters;
pub mod shifts;
pub mod tables;
pub mod taxes;
pub mod users;

pub use activity_logs as activity_log_entity;
pub use customer_points as customer_point_entity;
pub use customers as customer_entity;
pub use discounts as discount_entity;
pub use expenses as expense_entity;
pub use ingredients as ingredient_entity;
pub use inventories as inventory_entity;
pub use inventory_transactions as inventory_transaction_entity;
pub use loyalty_rewards as loyalty_reward_entity;
pub use loyalty_transactions as loyalty_transaction_entity;
pub use menu_categories as menu_category_entity;
pub use menu_ingredients as menu_ingredient_entity;
pub use menu_items as menu_item_entity;
pub use order_items as order_item_entity;
pub use order_taxes as order_tax_entity;
pub use orders as order_entity;
pub use outlets as outlet_entity;
pub use payment_splits as payment_split_entity;
pub use payments as payment_entity;
pub use refunds as refund_entity;
pub use sequence_counters as sequence_counter_entity;
pub use shifts as shift_entity;
pub use tables as table_entity;
pub use taxes as tax_entity;
pub use users as user_entity;

pub use enums::*;
