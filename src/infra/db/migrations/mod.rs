//! Schema history: accounts, then catalog, then carts, then orders.
//! Later tables reference earlier ones, so the order below matters.

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240102_000001_create_catalog_tables;
mod m20240103_000001_create_cart_tables;
mod m20240104_000001_create_order_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240102_000001_create_catalog_tables::Migration),
            Box::new(m20240103_000001_create_cart_tables::Migration),
            Box::new(m20240104_000001_create_order_tables::Migration),
        ]
    }
}
