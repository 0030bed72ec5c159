use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog product. `colors`, `sizes` and `imprint_methods` hold JSON arrays
/// serialized into text columns; use [`Model::colors`] and friends to read them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub base_price: Decimal,
    pub minimum_quantity: i32,
    #[sea_orm(column_type = "Text")]
    pub colors: String,
    #[sea_orm(column_type = "Text")]
    pub sizes: String,
    #[sea_orm(column_type = "Text")]
    pub imprint_methods: String,
    /// Production lead time in days.
    pub lead_time: Option<i32>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Supplier,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn colors(&self) -> Vec<String> {
        decode_list(&self.colors)
    }

    pub fn sizes(&self) -> Vec<String> {
        decode_list(&self.sizes)
    }

    pub fn imprint_methods(&self) -> Vec<String> {
        decode_list(&self.imprint_methods)
    }
}

/// Decodes a JSON-in-text list column. Legacy rows sometimes hold a plain
/// comma separated string instead of JSON; both are accepted.
pub fn decode_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(trimmed) {
        Ok(values) => values,
        Err(_) => trimmed
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

pub fn encode_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_list_accepts_json_and_legacy_csv() {
        assert_eq!(decode_list(r#"["Red","Blue"]"#), vec!["Red", "Blue"]);
        assert_eq!(decode_list("Red, Blue ,"), vec!["Red", "Blue"]);
        assert!(decode_list("   ").is_empty());
    }

    #[test]
    fn encode_list_produces_json() {
        let encoded = encode_list(&["S".to_string(), "M".to_string()]);
        assert_eq!(encoded, r#"["S","M"]"#);
    }
}
