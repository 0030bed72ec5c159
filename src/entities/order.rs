use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle of a quote or order. The sequence is descriptive: any status can
/// be set from any other.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
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
pub enum OrderStatus {
    #[sea_orm(string_value = "quote")]
    Quote,
    #[sea_orm(string_value = "pending_approval")]
    PendingApproval,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "in_production")]
    InProduction,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Orders that count towards revenue figures.
    pub fn counts_as_revenue(self) -> bool {
        !matches!(self, OrderStatus::Cancelled)
    }

    /// Confirmed work that has not been delivered yet.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            OrderStatus::Approved | OrderStatus::InProduction | OrderStatus::Shipped
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "orders")]
#[schema(as = Order)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub company_id: Uuid,
    pub contact_id: Option<Uuid>,
    pub assigned_user_id: Option<Uuid>,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    /// Margin in percent, as entered by the sales rep.
    pub margin: Option<Decimal>,
    pub in_hands_date: Option<NaiveDate>,
    pub event_date: Option<NaiveDate>,
    /// Visible to the customer on quotes and invoices.
    pub customer_notes: Option<String>,
    /// Never shown to the customer.
    pub internal_notes: Option<String>,
    pub supplier_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Company,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_parses_snake_case_names() {
        assert_eq!(
            OrderStatus::from_str("pending_approval").unwrap(),
            OrderStatus::PendingApproval
        );
        assert_eq!(OrderStatus::InProduction.to_string(), "in_production");
        assert!(OrderStatus::from_str("on_hold").is_err());
    }

    #[test]
    fn cancelled_orders_do_not_count_as_revenue() {
        assert!(!OrderStatus::Cancelled.counts_as_revenue());
        assert!(OrderStatus::Quote.counts_as_revenue());
        assert!(OrderStatus::InProduction.is_active());
        assert!(!OrderStatus::Delivered.is_active());
    }
}
