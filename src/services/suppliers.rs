use chrono::Utc;
use sea_orm::{entity::*, query::*};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{product, supplier},
    errors::ServiceError,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    #[serde(default)]
    pub is_preferred: bool,
    #[serde(default)]
    pub do_not_order: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub is_preferred: Option<bool>,
    pub do_not_order: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DbPool>,
}

impl SupplierService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<String>,
        preferred_only: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let mut query = supplier::Entity::find()
            .order_by_desc(supplier::Column::IsPreferred)
            .order_by_asc(supplier::Column::Name);
        if let Some(term) = search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(supplier::Column::Name.contains(term));
        }
        if preferred_only {
            query = query.filter(supplier::Column::IsPreferred.eq(true));
        }
        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<supplier::Model, ServiceError> {
        supplier::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", id))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateSupplierRequest) -> Result<supplier::Model, ServiceError> {
        request.validate()?;
        let now = Utc::now();
        let model = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            email: Set(request.email),
            phone: Set(request.phone),
            website: Set(request.website),
            address: Set(request.address),
            contact_person: Set(request.contact_person),
            is_preferred: Set(request.is_preferred),
            do_not_order: Set(request.do_not_order),
            notes: Set(request.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;
        info!(supplier_id = %model.id, "Supplier created");
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateSupplierRequest,
    ) -> Result<supplier::Model, ServiceError> {
        request.validate()?;
        let mut active: supplier::ActiveModel = self.get(id).await?.into();
        if let Some(v) = request.name {
            active.name = Set(v);
        }
        if let Some(v) = request.email {
            active.email = Set(Some(v));
        }
        if let Some(v) = request.phone {
            active.phone = Set(Some(v));
        }
        if let Some(v) = request.website {
            active.website = Set(Some(v));
        }
        if let Some(v) = request.address {
            active.address = Set(Some(v));
        }
        if let Some(v) = request.contact_person {
            active.contact_person = Set(Some(v));
        }
        if let Some(v) = request.is_preferred {
            active.is_preferred = Set(v);
        }
        if let Some(v) = request.do_not_order {
            active.do_not_order = Set(v);
        }
        if let Some(v) = request.notes {
            active.notes = Set(Some(v));
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    /// Refused while any product still references the supplier.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let supplier = self.get(id).await?;
        let products = product::Entity::find()
            .filter(product::Column::SupplierId.eq(id))
            .count(&*self.db)
            .await?;
        if products > 0 {
            return Err(ServiceError::Conflict(format!(
                "Supplier {} still has {} product(s)",
                supplier.name, products
            )));
        }
        supplier::Entity::delete_by_id(id).exec(&*self.db).await?;
        info!(supplier_id = %id, "Supplier deleted");
        Ok(())
    }
}
