use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CardPriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

/// A card on the artwork board. The list fields are JSON arrays stored in
/// text columns; the card DTO exposes them decoded.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artwork_cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub column_id: Uuid,
    pub order_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub priority: CardPriority,
    pub due_date: Option<NaiveDate>,
    pub assigned_user_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub labels: String,
    #[sea_orm(column_type = "Text")]
    pub attachments: String,
    #[sea_orm(column_type = "Text")]
    pub comments: String,
    #[sea_orm(column_type = "Text")]
    pub checklist: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::artwork_column::Entity",
        from = "Column::ColumnId",
        to = "super::artwork_column::Column::Id",
        on_delete = "Restrict"
    )]
    ArtworkColumn,
}

impl Related<super::artwork_column::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArtworkColumn.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
