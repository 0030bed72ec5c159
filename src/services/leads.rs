use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{entity::*, query::*, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        company, contact,
        lead::{self, LeadStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        activities::{ActivityService, NewActivity},
        companies::{insert_company, CreateCompanyRequest},
        contacts::{insert_contact, CreateContactRequest},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub source: Option<String>,
    #[schema(value_type = Option<String>)]
    pub estimated_value: Option<Decimal>,
    pub assigned_user_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLeadRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub source: Option<String>,
    /// One of new, contacted, qualified, unqualified. Use the convert
    /// operation to reach `converted`.
    pub status: Option<String>,
    #[schema(value_type = Option<String>)]
    pub estimated_value: Option<Decimal>,
    pub assigned_user_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Optional overrides for the records created by a conversion.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ConvertLeadRequest {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadConversion {
    pub lead: lead::Model,
    pub company: company::Model,
    pub contact: contact::Model,
}

pub fn parse_lead_status(raw: &str) -> Result<LeadStatus, ServiceError> {
    LeadStatus::from_str(raw)
        .map_err(|_| ServiceError::InvalidStatus(format!("Unknown lead status: {raw}")))
}

#[derive(Clone)]
pub struct LeadService {
    db: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl LeadService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<LeadStatus>,
        search: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<lead::Model>, u64), ServiceError> {
        let mut query = lead::Entity::find().order_by_desc(lead::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(lead::Column::Status.eq(status));
        }
        if let Some(term) = search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(lead::Column::FirstName.contains(term))
                    .add(lead::Column::LastName.contains(term))
                    .add(lead::Column::CompanyName.contains(term))
                    .add(lead::Column::Email.contains(term)),
            );
        }
        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn get(&self, id: Uuid) -> Result<lead::Model, ServiceError> {
        lead::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Lead", id))
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateLeadRequest) -> Result<lead::Model, ServiceError> {
        request.validate()?;
        let now = Utc::now();
        let model = lead::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            email: Set(request.email),
            phone: Set(request.phone),
            company_name: Set(request.company_name),
            source: Set(request.source),
            status: Set(LeadStatus::New),
            estimated_value: Set(request.estimated_value),
            assigned_user_id: Set(request.assigned_user_id),
            notes: Set(request.notes),
            converted_company_id: Set(None),
            converted_contact_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;
        info!(lead_id = %model.id, "Lead created");
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, id: Uuid, request: UpdateLeadRequest) -> Result<lead::Model, ServiceError> {
        request.validate()?;
        let status = request.status.as_deref().map(parse_lead_status).transpose()?;
        if status == Some(LeadStatus::Converted) {
            return Err(ServiceError::BadRequest(
                "leads are converted through the convert operation".to_string(),
            ));
        }

        let existing = self.get(id).await?;
        let mut active: lead::ActiveModel = existing.into();
        if let Some(status) = status {
            active.status = Set(status);
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
        if let Some(v) = request.company_name {
            active.company_name = Set(Some(v));
        }
        if let Some(v) = request.source {
            active.source = Set(Some(v));
        }
        if let Some(v) = request.estimated_value {
            active.estimated_value = Set(Some(v));
        }
        if let Some(v) = request.assigned_user_id {
            active.assigned_user_id = Set(Some(v));
        }
        if let Some(v) = request.notes {
            active.notes = Set(Some(v));
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = lead::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Lead", id));
        }
        Ok(())
    }

    /// Turns a lead into a company with a primary contact. The lead keeps
    /// pointers to both and is marked converted.
    #[instrument(skip(self, request))]
    pub async fn convert(
        &self,
        id: Uuid,
        request: ConvertLeadRequest,
        acting_user: Option<Uuid>,
    ) -> Result<LeadConversion, ServiceError> {
        let lead = self.get(id).await?;
        if lead.status == LeadStatus::Converted {
            return Err(ServiceError::Conflict(format!("Lead {} is already converted", id)));
        }

        let company_name = request
            .company_name
            .or_else(|| lead.company_name.clone())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("{} {}", lead.first_name, lead.last_name));

        let txn = self.db.begin().await?;
        let company = insert_company(
            &txn,
            CreateCompanyRequest {
                name: company_name,
                email: lead.email.clone(),
                phone: lead.phone.clone(),
                website: None,
                address: None,
                city: None,
                state: None,
                zip: None,
                country: None,
                industry: request.industry,
                notes: lead.notes.clone(),
            },
        )
        .await?;
        let contact = insert_contact(
            &txn,
            CreateContactRequest {
                company_id: Some(company.id),
                supplier_id: None,
                first_name: lead.first_name.clone(),
                last_name: lead.last_name.clone(),
                email: lead.email.clone(),
                phone: lead.phone.clone(),
                title: request.title,
                is_primary: true,
            },
        )
        .await?;

        let mut active: lead::ActiveModel = lead.into();
        active.status = Set(LeadStatus::Converted);
        active.converted_company_id = Set(Some(company.id));
        active.converted_contact_id = Set(Some(contact.id));
        active.updated_at = Set(Utc::now());
        let lead = active.update(&txn).await?;

        ActivityService::record(
            &txn,
            NewActivity::new(
                "lead",
                lead.id,
                "converted",
                format!("Lead converted into company {}", company.name),
            )
            .by(acting_user)
            .with_metadata(serde_json::json!({
                "company_id": company.id,
                "contact_id": contact.id,
            })),
        )
        .await?;
        txn.commit().await?;

        info!(lead_id = %lead.id, company_id = %company.id, "Lead converted");
        if let Some(sender) = &self.event_sender {
            let event = Event::LeadConverted {
                lead_id: lead.id,
                company_id: company.id,
                contact_id: contact.id,
            };
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send lead converted event");
            }
        }

        Ok(LeadConversion {
            lead,
            company,
            contact,
        })
    }
}
