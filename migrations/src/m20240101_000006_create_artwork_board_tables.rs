use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_crm_tables::{Companies, Users};
use super::m20240101_000003_create_orders_tables::Orders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArtworkColumns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ArtworkColumns::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ArtworkColumns::Name).string().not_null())
                    .col(ColumnDef::new(ArtworkColumns::Position).integer().not_null())
                    .col(
                        ColumnDef::new(ArtworkColumns::Color)
                            .string_len(16)
                            .not_null()
                            .default("#6b7280"),
                    )
                    .col(
                        ColumnDef::new(ArtworkColumns::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ArtworkColumns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ArtworkCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ArtworkCards::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ArtworkCards::ColumnId).uuid().not_null())
                    .col(ColumnDef::new(ArtworkCards::OrderId).uuid().null())
                    .col(ColumnDef::new(ArtworkCards::CompanyId).uuid().null())
                    .col(ColumnDef::new(ArtworkCards::Title).string().not_null())
                    .col(ColumnDef::new(ArtworkCards::Description).text().null())
                    .col(ColumnDef::new(ArtworkCards::Position).integer().not_null())
                    .col(
                        ColumnDef::new(ArtworkCards::Priority)
                            .string_len(16)
                            .not_null()
                            .default("medium"),
                    )
                    .col(ColumnDef::new(ArtworkCards::DueDate).date().null())
                    .col(ColumnDef::new(ArtworkCards::AssignedUserId).uuid().null())
                    .col(
                        ColumnDef::new(ArtworkCards::Labels)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(ArtworkCards::Attachments)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(ArtworkCards::Comments)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(ArtworkCards::Checklist)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(ArtworkCards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArtworkCards::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artwork_cards_column_id")
                            .from(ArtworkCards::Table, ArtworkCards::ColumnId)
                            .to(ArtworkColumns::Table, ArtworkColumns::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artwork_cards_order_id")
                            .from(ArtworkCards::Table, ArtworkCards::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artwork_cards_company_id")
                            .from(ArtworkCards::Table, ArtworkCards::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artwork_cards_assigned_user_id")
                            .from(ArtworkCards::Table, ArtworkCards::AssignedUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArtworkCards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ArtworkColumns::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ArtworkColumns {
    Table,
    Id,
    Name,
    Position,
    Color,
    IsDefault,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ArtworkCards {
    Table,
    Id,
    ColumnId,
    OrderId,
    CompanyId,
    Title,
    Description,
    Position,
    Priority,
    DueDate,
    AssignedUserId,
    Labels,
    Attachments,
    Comments,
    Checklist,
    CreatedAt,
    UpdatedAt,
}
