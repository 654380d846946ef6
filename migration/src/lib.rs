pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_outlets_and_staff;
mod m20250901_000002_create_catalog_and_inventory;
mod m20250901_000003_create_customers_and_orders;
mod m20250901_000004_create_payments_and_loyalty;
mod m20250901_000005_create_shifts_and_expenses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_outlets_and_staff::Migration),
            Box::new(m20250901_000002_create_catalog_and_inventory::Migration),
            Box::new(m20250901_000003_create_customers_and_orders::Migration),
            Box::new(m20250901_000004_create_payments_and_loyalty::Migration),
            Box::new(m20250901_000005_create_shifts_and_expenses::Migration),
        ]
    }
}
