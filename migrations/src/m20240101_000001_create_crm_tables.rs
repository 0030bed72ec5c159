use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().null())
                    .col(ColumnDef::new(Users::LastName).string().null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(32)
                            .not_null()
                            .default("sales_rep"),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .col(ColumnDef::new(Companies::Email).string().null())
                    .col(ColumnDef::new(Companies::Phone).string().null())
                    .col(ColumnDef::new(Companies::Website).string().null())
                    .col(ColumnDef::new(Companies::Address).text().null())
                    .col(ColumnDef::new(Companies::City).string().null())
                    .col(ColumnDef::new(Companies::State).string().null())
                    .col(ColumnDef::new(Companies::Zip).string().null())
                    .col(ColumnDef::new(Companies::Country).string().null())
                    .col(ColumnDef::new(Companies::Industry).string().null())
                    .col(ColumnDef::new(Companies::Notes).text().null())
                    .col(
                        ColumnDef::new(Companies::YtdSpend)
                            .decimal_len(12, 2)
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Companies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suppliers::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Suppliers::Name).string().not_null())
                    .col(ColumnDef::new(Suppliers::Email).string().null())
                    .col(ColumnDef::new(Suppliers::Phone).string().null())
                    .col(ColumnDef::new(Suppliers::Website).string().null())
                    .col(ColumnDef::new(Suppliers::Address).text().null())
                    .col(ColumnDef::new(Suppliers::ContactPerson).string().null())
                    .col(
                        ColumnDef::new(Suppliers::IsPreferred)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Suppliers::DoNotOrder)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Suppliers::Notes).text().null())
                    .col(
                        ColumnDef::new(Suppliers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Suppliers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contacts::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Contacts::CompanyId).uuid().null())
                    .col(ColumnDef::new(Contacts::SupplierId).uuid().null())
                    .col(ColumnDef::new(Contacts::FirstName).string().not_null())
                    .col(ColumnDef::new(Contacts::LastName).string().not_null())
                    .col(ColumnDef::new(Contacts::Email).string().null())
                    .col(ColumnDef::new(Contacts::Phone).string().null())
                    .col(ColumnDef::new(Contacts::Title).string().null())
                    .col(
                        ColumnDef::new(Contacts::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Contacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contacts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_company_id")
                            .from(Contacts::Table, Contacts::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_supplier_id")
                            .from(Contacts::Table, Contacts::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leads::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Leads::FirstName).string().not_null())
                    .col(ColumnDef::new(Leads::LastName).string().not_null())
                    .col(ColumnDef::new(Leads::Email).string().null())
                    .col(ColumnDef::new(Leads::Phone).string().null())
                    .col(ColumnDef::new(Leads::CompanyName).string().null())
                    .col(ColumnDef::new(Leads::Source).string().null())
                    .col(
                        ColumnDef::new(Leads::Status)
                            .string_len(32)
                            .not_null()
                            .default("new"),
                    )
                    .col(ColumnDef::new(Leads::EstimatedValue).decimal_len(12, 2).null())
                    .col(ColumnDef::new(Leads::AssignedUserId).uuid().null())
                    .col(ColumnDef::new(Leads::Notes).text().null())
                    .col(ColumnDef::new(Leads::ConvertedCompanyId).uuid().null())
                    .col(ColumnDef::new(Leads::ConvertedContactId).uuid().null())
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Leads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_assigned_user_id")
                            .from(Leads::Table, Leads::AssignedUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Companies {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Website,
    Address,
    City,
    State,
    Zip,
    Country,
    Industry,
    Notes,
    YtdSpend,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Suppliers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Website,
    Address,
    ContactPerson,
    IsPreferred,
    DoNotOrder,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Contacts {
    Table,
    Id,
    CompanyId,
    SupplierId,
    FirstName,
    LastName,
    Email,
    Phone,
    Title,
    IsPrimary,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Leads {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    CompanyName,
    Source,
    Status,
    EstimatedValue,
    AssignedUserId,
    Notes,
    ConvertedCompanyId,
    ConvertedContactId,
    CreatedAt,
    UpdatedAt,
}
