use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepType {
    #[sea_orm(string_value = "email")]
    Email,
    #[sea_orm(string_value = "task")]
    Task,
    #[sea_orm(string_value = "call")]
    Call,
    #[sea_orm(string_value = "linkedin_message")]
    LinkedinMessage,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "sequence_steps")]
#[schema(as = SequenceStep)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sequence_id: Uuid,
    pub position: i32,
    pub step_type: StepType,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub delay_days: i32,
    pub delay_hours: i32,
    pub delay_minutes: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sequence::Entity",
        from = "Column::SequenceId",
        to = "super::sequence::Column::Id",
        on_delete = "Cascade"
    )]
    Sequence,
}

impl Related<super::sequence::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sequence.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
