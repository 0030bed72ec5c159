pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_crm_tables;
mod m20240101_000002_create_catalog_tables;
mod m20240101_000003_create_orders_tables;
mod m20240101_000004_create_order_records_tables;
mod m20240101_000005_create_activity_tables;
mod m20240101_000006_create_artwork_board_tables;
mod m20240101_000007_create_mockups_table;
mod m20240101_000008_create_sequence_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_crm_tables::Migration),
            Box::new(m20240101_000002_create_catalog_tables::Migration),
            Box::new(m20240101_000003_create_orders_tables::Migration),
            Box::new(m20240101_000004_create_order_records_tables::Migration),
            Box::new(m20240101_000005_create_activity_tables::Migration),
            Box::new(m20240101_000006_create_artwork_board_tables::Migration),
            Box::new(m20240101_000007_create_mockups_table::Migration),
            Box::new(m20240101_000008_create_sequence_tables::Migration),
        ]
    }
}
