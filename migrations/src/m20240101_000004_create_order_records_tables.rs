use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_crm_tables::{Companies, Users};
use super::m20240101_000003_create_orders_tables::Orders;

/// Artwork files, attachments and communication logs hanging off orders.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArtworkFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ArtworkFiles::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ArtworkFiles::OrderId).uuid().null())
                    .col(ColumnDef::new(ArtworkFiles::CompanyId).uuid().null())
                    .col(ColumnDef::new(ArtworkFiles::FileName).string().not_null())
                    .col(ColumnDef::new(ArtworkFiles::OriginalName).string().not_null())
                    .col(ColumnDef::new(ArtworkFiles::FilePath).string().not_null())
                    .col(ColumnDef::new(ArtworkFiles::MimeType).string().null())
                    .col(ColumnDef::new(ArtworkFiles::FileSize).big_integer().null())
                    .col(ColumnDef::new(ArtworkFiles::UploadedBy).uuid().null())
                    .col(
                        ColumnDef::new(ArtworkFiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artwork_files_order_id")
                            .from(ArtworkFiles::Table, ArtworkFiles::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artwork_files_company_id")
                            .from(ArtworkFiles::Table, ArtworkFiles::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artwork_files_uploaded_by")
                            .from(ArtworkFiles::Table, ArtworkFiles::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attachments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attachments::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attachments::OrderId).uuid().not_null())
                    .col(ColumnDef::new(Attachments::FileName).string().not_null())
                    .col(ColumnDef::new(Attachments::OriginalName).string().not_null())
                    .col(ColumnDef::new(Attachments::FilePath).string().not_null())
                    .col(ColumnDef::new(Attachments::MimeType).string().null())
                    .col(ColumnDef::new(Attachments::FileSize).big_integer().null())
                    .col(ColumnDef::new(Attachments::Category).string().null())
                    .col(ColumnDef::new(Attachments::UploadedBy).uuid().null())
                    .col(
                        ColumnDef::new(Attachments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attachments_order_id")
                            .from(Attachments::Table, Attachments::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Communications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Communications::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Communications::OrderId).uuid().null())
                    .col(ColumnDef::new(Communications::CompanyId).uuid().null())
                    .col(ColumnDef::new(Communications::UserId).uuid().null())
                    .col(
                        ColumnDef::new(Communications::Kind)
                            .string_len(16)
                            .not_null()
                            .default("email"),
                    )
                    .col(
                        ColumnDef::new(Communications::Direction)
                            .string_len(16)
                            .not_null()
                            .default("outbound"),
                    )
                    .col(ColumnDef::new(Communications::Subject).string().null())
                    .col(ColumnDef::new(Communications::Body).text().not_null())
                    .col(ColumnDef::new(Communications::Recipient).string().null())
                    .col(
                        ColumnDef::new(Communications::SentAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_communications_order_id")
                            .from(Communications::Table, Communications::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_communications_company_id")
                            .from(Communications::Table, Communications::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Communications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attachments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ArtworkFiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ArtworkFiles {
    Table,
    Id,
    OrderId,
    CompanyId,
    FileName,
    OriginalName,
    FilePath,
    MimeType,
    FileSize,
    UploadedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Attachments {
    Table,
    Id,
    OrderId,
    FileName,
    OriginalName,
    FilePath,
    MimeType,
    FileSize,
    Category,
    UploadedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Communications {
    Table,
    Id,
    OrderId,
    CompanyId,
    UserId,
    Kind,
    Direction,
    Subject,
    Body,
    Recipient,
    SentAt,
}
