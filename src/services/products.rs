use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{entity::*, query::*};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        order_item,
        product::{self, encode_list},
        product_category, supplier,
    },
    errors::ServiceError,
    models::order_totals::round_money,
};

/// Product as returned by the API, list columns decoded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    #[schema(value_type = String)]
    pub base_price: Decimal,
    pub minimum_quantity: i32,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub imprint_methods: Vec<String>,
    pub lead_time: Option<i32>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        let colors = model.colors();
        let sizes = model.sizes();
        let imprint_methods = model.imprint_methods();
        Self {
            id: model.id,
            supplier_id: model.supplier_id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            sku: model.sku,
            base_price: model.base_price,
            minimum_quantity: model.minimum_quantity,
            colors,
            sizes,
            imprint_methods,
            lead_time: model.lead_time,
            image_url: model.image_url,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    pub supplier_id: Uuid,
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    #[schema(value_type = String, example = "4.25")]
    pub base_price: Decimal,
    #[validate(range(min = 1))]
    pub minimum_quantity: Option<i32>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub imprint_methods: Vec<String>,
    #[validate(range(min = 0))]
    pub lead_time: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    #[schema(value_type = Option<String>)]
    pub base_price: Option<Decimal>,
    #[validate(range(min = 1))]
    pub minimum_quantity: Option<i32>,
    pub colors: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub imprint_methods: Option<Vec<String>>,
    #[validate(range(min = 0))]
    pub lead_time: Option<i32>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct ProductSearch {
    /// Free text over name, sku and description.
    pub query: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub include_inactive: bool,
}

#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    pub async fn list_categories(&self) -> Result<Vec<product_category::Model>, ServiceError> {
        Ok(product_category::Entity::find()
            .order_by_asc(product_category::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<product_category::Model, ServiceError> {
        request.validate()?;
        let exists = product_category::Entity::find()
            .filter(product_category::Column::Name.eq(request.name.as_str()))
            .count(&*self.db)
            .await?;
        if exists > 0 {
            return Err(ServiceError::Conflict(format!(
                "Category {} already exists",
                request.name
            )));
        }
        Ok(product_category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            description: Set(request.description),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?)
    }

    #[instrument(skip(self))]
    pub async fn search(
        &self,
        search: ProductSearch,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ProductResponse>, u64), ServiceError> {
        let mut query = product::Entity::find().order_by_asc(product::Column::Name);
        if let Some(term) = search.query.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(product::Column::Name.contains(term))
                    .add(product::Column::Sku.contains(term))
                    .add(product::Column::Description.contains(term)),
            );
        }
        if let Some(supplier_id) = search.supplier_id {
            query = query.filter(product::Column::SupplierId.eq(supplier_id));
        }
        if let Some(category_id) = search.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }
        if !search.include_inactive {
            query = query.filter(product::Column::IsActive.eq(true));
        }

        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items.into_iter().map(ProductResponse::from).collect(), total))
    }

    pub async fn find(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    pub async fn get(&self, id: Uuid) -> Result<ProductResponse, ServiceError> {
        self.find(id).await.map(ProductResponse::from)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateProductRequest) -> Result<ProductResponse, ServiceError> {
        request.validate()?;
        let db = &*self.db;
        if request.base_price.is_sign_negative() {
            return Err(ServiceError::ValidationError(
                "base_price must not be negative".to_string(),
            ));
        }
        supplier::Entity::find_by_id(request.supplier_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", request.supplier_id))?;
        if let Some(category_id) = request.category_id {
            product_category::Entity::find_by_id(category_id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Category", category_id))?;
        }

        let now = Utc::now();
        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            supplier_id: Set(request.supplier_id),
            category_id: Set(request.category_id),
            name: Set(request.name),
            description: Set(request.description),
            sku: Set(request.sku),
            base_price: Set(round_money(request.base_price)),
            minimum_quantity: Set(request.minimum_quantity.unwrap_or(1)),
            colors: Set(encode_list(&request.colors)),
            sizes: Set(encode_list(&request.sizes)),
            imprint_methods: Set(encode_list(&request.imprint_methods)),
            lead_time: Set(request.lead_time),
            image_url: Set(request.image_url),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
        info!(product_id = %model.id, "Product created");
        Ok(model.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        request.validate()?;
        let mut active: product::ActiveModel = self.find(id).await?.into();
        if let Some(v) = request.category_id {
            active.category_id = Set(Some(v));
        }
        if let Some(v) = request.name {
            active.name = Set(v);
        }
        if let Some(v) = request.description {
            active.description = Set(Some(v));
        }
        if let Some(v) = request.sku {
            active.sku = Set(Some(v));
        }
        if let Some(price) = request.base_price {
            if price.is_sign_negative() {
                return Err(ServiceError::ValidationError(
                    "base_price must not be negative".to_string(),
                ));
            }
            active.base_price = Set(round_money(price));
        }
        if let Some(v) = request.minimum_quantity {
            active.minimum_quantity = Set(v);
        }
        if let Some(v) = request.colors {
            active.colors = Set(encode_list(&v));
        }
        if let Some(v) = request.sizes {
            active.sizes = Set(encode_list(&v));
        }
        if let Some(v) = request.imprint_methods {
            active.imprint_methods = Set(encode_list(&v));
        }
        if let Some(v) = request.lead_time {
            active.lead_time = Set(Some(v));
        }
        if let Some(v) = request.image_url {
            active.image_url = Set(Some(v));
        }
        if let Some(v) = request.is_active {
            active.is_active = Set(v);
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?.into())
    }

    /// Refused while order items reference the product; deactivate it instead.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.find(id).await?;
        let used = order_item::Entity::find()
            .filter(order_item::Column::ProductId.eq(id))
            .count(&*self.db)
            .await?;
        if used > 0 {
            return Err(ServiceError::Conflict(format!(
                "Product {} is used by {} order item(s)",
                id, used
            )));
        }
        product::Entity::delete_by_id(id).exec(&*self.db).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
