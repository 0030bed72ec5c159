use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_catalog_tables::Products;
use super::m20240101_000003_create_orders_tables::Orders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mockups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Mockups::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Mockups::Name).string().not_null())
                    .col(ColumnDef::new(Mockups::ProductId).uuid().null())
                    .col(ColumnDef::new(Mockups::OrderId).uuid().null())
                    .col(ColumnDef::new(Mockups::ProductImageUrl).string().null())
                    .col(
                        ColumnDef::new(Mockups::Logos)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Mockups::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Mockups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Mockups::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mockups_product_id")
                            .from(Mockups::Table, Mockups::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mockups_order_id")
                            .from(Mockups::Table, Mockups::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mockups::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Mockups {
    Table,
    Id,
    Name,
    ProductId,
    OrderId,
    ProductImageUrl,
    Logos,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
