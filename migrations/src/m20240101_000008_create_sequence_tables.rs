use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_crm_tables::Contacts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sequences::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sequences::Name).string().not_null())
                    .col(ColumnDef::new(Sequences::Description).text().null())
                    .col(
                        ColumnDef::new(Sequences::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Sequences::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Sequences::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sequences::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SequenceSteps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SequenceSteps::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SequenceSteps::SequenceId).uuid().not_null())
                    .col(ColumnDef::new(SequenceSteps::Position).integer().not_null())
                    .col(
                        ColumnDef::new(SequenceSteps::StepType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SequenceSteps::Subject).string().null())
                    .col(ColumnDef::new(SequenceSteps::Content).text().null())
                    .col(
                        ColumnDef::new(SequenceSteps::DelayDays)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SequenceSteps::DelayHours)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SequenceSteps::DelayMinutes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sequence_steps_sequence_id")
                            .from(SequenceSteps::Table, SequenceSteps::SequenceId)
                            .to(Sequences::Table, Sequences::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SequenceEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SequenceEnrollments::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SequenceEnrollments::SequenceId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SequenceEnrollments::ContactId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SequenceEnrollments::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(SequenceEnrollments::CurrentStep)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SequenceEnrollments::EnrolledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SequenceEnrollments::NextStepAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SequenceEnrollments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sequence_enrollments_sequence_id")
                            .from(SequenceEnrollments::Table, SequenceEnrollments::SequenceId)
                            .to(Sequences::Table, Sequences::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sequence_enrollments_contact_id")
                            .from(SequenceEnrollments::Table, SequenceEnrollments::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SequenceEnrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SequenceSteps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sequences::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Sequences {
    Table,
    Id,
    Name,
    Description,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SequenceSteps {
    Table,
    Id,
    SequenceId,
    Position,
    StepType,
    Subject,
    Content,
    DelayDays,
    DelayHours,
    DelayMinutes,
}

#[derive(DeriveIden)]
enum SequenceEnrollments {
    Table,
    Id,
    SequenceId,
    ContactId,
    Status,
    CurrentStep,
    EnrolledAt,
    NextStepAt,
    UpdatedAt,
}
