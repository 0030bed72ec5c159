use chrono::Utc;
use sea_orm::{entity::*, query::*, sea_query::Expr, ConnectionTrait, TransactionTrait};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{company, contact, supplier},
    errors::ServiceError,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateContactRequest {
    pub company_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Partial update. A `company_id` or `supplier_id` that is present moves the
/// contact and clears the other link.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateContactRequest {
    pub company_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub is_primary: Option<bool>,
}

#[derive(Debug, Default)]
pub struct ContactFilter {
    pub company_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct ContactService {
    db: Arc<DbPool>,
}

impl ContactService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: ContactFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<contact::Model>, u64), ServiceError> {
        let mut query = contact::Entity::find()
            .order_by_desc(contact::Column::IsPrimary)
            .order_by_asc(contact::Column::LastName)
            .order_by_asc(contact::Column::FirstName);
        if let Some(company_id) = filter.company_id {
            query = query.filter(contact::Column::CompanyId.eq(company_id));
        }
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(contact::Column::SupplierId.eq(supplier_id));
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(contact::Column::FirstName.contains(term))
                    .add(contact::Column::LastName.contains(term))
                    .add(contact::Column::Email.contains(term)),
            );
        }

        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<contact::Model, ServiceError> {
        contact::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Contact", id))
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateContactRequest) -> Result<contact::Model, ServiceError> {
        request.validate()?;
        let txn = self.db.begin().await?;
        let model = insert_contact(&txn, request).await?;
        txn.commit().await?;
        info!(contact_id = %model.id, "Contact created");
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateContactRequest,
    ) -> Result<contact::Model, ServiceError> {
        request.validate()?;
        if request.company_id.is_some() && request.supplier_id.is_some() {
            return Err(link_error());
        }

        let txn = self.db.begin().await?;
        let existing = contact::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Contact", id))?;
        let mut company_id = existing.company_id;
        let mut active: contact::ActiveModel = existing.into();

        if let Some(new_company) = request.company_id {
            ensure_company(&txn, new_company).await?;
            // A contact does not carry its primary flag into another company.
            if company_id != Some(new_company) {
                active.is_primary = Set(false);
            }
            company_id = Some(new_company);
            active.company_id = Set(Some(new_company));
            active.supplier_id = Set(None);
        }
        if let Some(new_supplier) = request.supplier_id {
            ensure_supplier(&txn, new_supplier).await?;
            company_id = None;
            active.supplier_id = Set(Some(new_supplier));
            active.company_id = Set(None);
            active.is_primary = Set(false);
        }
        if let Some(v) = request.first_name {
            active.first_name = Set(v);
        }
        if let Some(v) = request.last_name {
            active.last_name = Set(v);
        }
        if let Some(v) = request.email {
            active.email = Set(Some(v));
        }
        if let Some(v) = request.phone {
            active.phone = Set(Some(v));
        }
        if let Some(v) = request.title {
            active.title = Set(Some(v));
        }
        if let Some(primary) = request.is_primary {
            let primary = primary && company_id.is_some();
            if let (true, Some(company_id)) = (primary, company_id) {
                clear_primary(&txn, company_id, Some(id)).await?;
            }
            active.is_primary = Set(primary);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&txn).await?;
        txn.commit().await?;
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = contact::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Contact", id));
        }
        info!(contact_id = %id, "Contact deleted");
        Ok(())
    }
}

fn link_error() -> ServiceError {
    ServiceError::ValidationError(
        "a contact belongs to either a company or a supplier, not both".to_string(),
    )
}

async fn ensure_company<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), ServiceError> {
    company::Entity::find_by_id(id)
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| ServiceError::not_found("Company", id))
}

async fn ensure_supplier<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), ServiceError> {
    supplier::Entity::find_by_id(id)
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| ServiceError::not_found("Supplier", id))
}

/// Clears `is_primary` on the company's contacts, except `keep`.
async fn clear_primary<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    keep: Option<Uuid>,
) -> Result<(), ServiceError> {
    let mut update = contact::Entity::update_many()
        .col_expr(contact::Column::IsPrimary, Expr::value(false))
        .filter(contact::Column::CompanyId.eq(company_id))
        .filter(contact::Column::IsPrimary.eq(true));
    if let Some(keep) = keep {
        update = update.filter(contact::Column::Id.ne(keep));
    }
    update.exec(conn).await?;
    Ok(())
}

/// Inserts a contact, enforcing the single-link and single-primary rules.
/// Shared with lead conversion.
pub(crate) async fn insert_contact<C: ConnectionTrait>(
    conn: &C,
    request: CreateContactRequest,
) -> Result<contact::Model, ServiceError> {
    if request.company_id.is_some() && request.supplier_id.is_some() {
        return Err(link_error());
    }
    if let Some(company_id) = request.company_id {
        ensure_company(conn, company_id).await?;
    }
    if let Some(supplier_id) = request.supplier_id {
        ensure_supplier(conn, supplier_id).await?;
    }

    let is_primary = request.is_primary && request.company_id.is_some();
    if let (true, Some(company_id)) = (is_primary, request.company_id) {
        clear_primary(conn, company_id, None).await?;
    }

    let now = Utc::now();
    Ok(contact::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(request.company_id),
        supplier_id: Set(request.supplier_id),
        first_name: Set(request.first_name),
        last_name: Set(request.last_name),
        email: Set(request.email),
        phone: Set(request.phone),
        title: Set(request.title),
        is_primary: Set(is_primary),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?)
}
