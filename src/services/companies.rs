use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    entity::*, query::*, sea_query::Expr, ConnectionTrait, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{company, contact, order, order::OrderStatus},
    errors::ServiceError,
    events::{Event, EventSender},
    services::activities::{ActivityService, NewActivity},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub industry: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub industry: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default)]
pub struct CompanyFilter {
    /// Matches name or industry.
    pub search: Option<String>,
    pub industry: Option<String>,
}

#[derive(Clone)]
pub struct CompanyService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl CompanyService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: CompanyFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<company::Model>, u64), ServiceError> {
        let mut query = company::Entity::find().order_by_asc(company::Column::Name);
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(company::Column::Name.contains(term))
                    .add(company::Column::Industry.contains(term)),
            );
        }
        if let Some(industry) = filter.industry {
            query = query.filter(company::Column::Industry.eq(industry));
        }

        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<company::Model, ServiceError> {
        company::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Company", id))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateCompanyRequest,
        acting_user: Option<Uuid>,
    ) -> Result<company::Model, ServiceError> {
        request.validate()?;
        let txn = self.db.begin().await?;
        let model = insert_company(&txn, request).await?;
        ActivityService::record(
            &txn,
            NewActivity::new("company", model.id, "created", format!("Company {} created", model.name))
                .by(acting_user),
        )
        .await?;
        txn.commit().await?;

        info!(company_id = %model.id, "Company created");
        self.emit(Event::CompanyCreated(model.id)).await;
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCompanyRequest,
    ) -> Result<company::Model, ServiceError> {
        request.validate()?;
        let existing = self.get(id).await?;
        let mut active: company::ActiveModel = existing.into();

        if let Some(name) = request.name {
            active.name = Set(name);
        }
        macro_rules! set_opt {
            ($($field:ident),*) => {
                $(if let Some(v) = request.$field { active.$field = Set(Some(v)); })*
            };
        }
        set_opt!(email, phone, website, address, city, state, zip, country, industry, notes);
        active.updated_at = Set(Utc::now());

        Ok(active.update(&*self.db).await?)
    }

    /// Deletes a company. Refused while orders reference it; contacts are
    /// detached and artwork files go with the company.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, acting_user: Option<Uuid>) -> Result<(), ServiceError> {
        let company = self.get(id).await?;
        let order_count = order::Entity::find()
            .filter(order::Column::CompanyId.eq(id))
            .count(&*self.db)
            .await?;
        if order_count > 0 {
            warn!(company_id = %id, order_count, "Refusing to delete company with orders");
            return Err(ServiceError::Conflict(format!(
                "Company {} still has {} order(s)",
                company.name, order_count
            )));
        }

        let txn = self.db.begin().await?;
        let detached = contact::Entity::update_many()
            .col_expr(contact::Column::CompanyId, Expr::value(Option::<Uuid>::None))
            .col_expr(contact::Column::IsPrimary, Expr::value(false))
            .filter(contact::Column::CompanyId.eq(id))
            .exec(&txn)
            .await?;

        company::Entity::delete_by_id(id).exec(&txn).await.map_err(|e| {
            error!(error = %e, company_id = %id, "Failed to delete company");
            ServiceError::from(e)
        })?;

        ActivityService::record(
            &txn,
            NewActivity::new("company", id, "deleted", format!("Company {} deleted", company.name))
                .by(acting_user),
        )
        .await?;
        txn.commit().await?;

        info!(company_id = %id, contacts_detached = detached.rows_affected, "Company deleted");
        self.emit(Event::CompanyDeleted(id)).await;
        Ok(())
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send company event");
            }
        }
    }
}

pub(crate) async fn insert_company<C: ConnectionTrait>(
    conn: &C,
    request: CreateCompanyRequest,
) -> Result<company::Model, ServiceError> {
    let now = Utc::now();
    Ok(company::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(request.name.trim().to_string()),
        email: Set(request.email),
        phone: Set(request.phone),
        website: Set(request.website),
        address: Set(request.address),
        city: Set(request.city),
        state: Set(request.state),
        zip: Set(request.zip),
        country: Set(request.country),
        industry: Set(request.industry),
        notes: Set(request.notes),
        ytd_spend: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?)
}

/// Midnight UTC on January 1st of `now`'s year.
pub(crate) fn start_of_year(now: DateTime<Utc>) -> Result<DateTime<Utc>, ServiceError> {
    Utc.with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ServiceError::InternalError("invalid year start".to_string()))
}

/// Recomputes `ytd_spend` from the company's non-cancelled orders created
/// this calendar year.
pub async fn refresh_ytd_spend<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
) -> Result<Decimal, ServiceError> {
    let year_start = start_of_year(Utc::now())?;

    let spend: Option<Decimal> = order::Entity::find()
        .select_only()
        .column_as(order::Column::Total.sum(), "spend")
        .filter(order::Column::CompanyId.eq(company_id))
        .filter(order::Column::Status.ne(OrderStatus::Cancelled))
        .filter(order::Column::CreatedAt.gte(year_start))
        .into_tuple::<Option<Decimal>>()
        .one(conn)
        .await?
        .flatten();
    let spend = crate::models::order_totals::round_money(spend.unwrap_or(Decimal::ZERO));

    company::Entity::update_many()
        .col_expr(company::Column::YtdSpend, Expr::value(spend))
        .filter(company::Column::Id.eq(company_id))
        .exec(conn)
        .await?;
    Ok(spend)
}
