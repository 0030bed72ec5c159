use chrono::{DateTime, Utc};
use sea_orm::{entity::*, query::*};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        artwork_file, attachment,
        communication::{self, CommunicationDirection, CommunicationKind},
        company, order,
    },
    errors::ServiceError,
};

/// File metadata shared by artwork files and attachments. Upload storage is
/// handled outside this service; only the resulting path is recorded.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewFileRequest {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1, max = 255))]
    pub original_name: String,
    #[validate(length(min = 1))]
    pub file_path: String,
    pub mime_type: Option<String>,
    #[validate(range(min = 0))]
    pub file_size: Option<i64>,
    /// Attachments only.
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommunicationRequest {
    pub kind: CommunicationKind,
    pub direction: CommunicationDirection,
    #[validate(length(max = 255))]
    pub subject: Option<String>,
    #[validate(length(min = 1))]
    pub body: String,
    pub recipient: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// Artwork files, attachments and the communication log hanging off orders.
#[derive(Clone)]
pub struct OrderRecordService {
    db: Arc<DbPool>,
}

impl OrderRecordService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    async fn ensure_order(&self, order_id: Uuid) -> Result<order::Model, ServiceError> {
        order::Entity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))
    }

    pub async fn list_artwork_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<artwork_file::Model>, ServiceError> {
        self.ensure_order(order_id).await?;
        Ok(artwork_file::Entity::find()
            .filter(artwork_file::Column::OrderId.eq(order_id))
            .order_by_desc(artwork_file::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    pub async fn list_artwork_for_company(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<artwork_file::Model>, ServiceError> {
        company::Entity::find_by_id(company_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Company", company_id))?;
        Ok(artwork_file::Entity::find()
            .filter(artwork_file::Column::CompanyId.eq(company_id))
            .order_by_desc(artwork_file::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Records an artwork file for an order. The file is also filed under
    /// the order's company.
    #[instrument(skip(self, request), fields(file_name = %request.file_name))]
    pub async fn add_artwork(
        &self,
        order_id: Uuid,
        request: NewFileRequest,
        uploaded_by: Option<Uuid>,
    ) -> Result<artwork_file::Model, ServiceError> {
        request.validate()?;
        let order = self.ensure_order(order_id).await?;
        let model = artwork_file::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(Some(order_id)),
            company_id: Set(Some(order.company_id)),
            file_name: Set(request.file_name),
            original_name: Set(request.original_name),
            file_path: Set(request.file_path),
            mime_type: Set(request.mime_type),
            file_size: Set(request.file_size),
            uploaded_by: Set(uploaded_by),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;
        info!(artwork_file_id = %model.id, order_id = %order_id, "Artwork file recorded");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete_artwork(&self, order_id: Uuid, file_id: Uuid) -> Result<(), ServiceError> {
        let result = artwork_file::Entity::delete_many()
            .filter(artwork_file::Column::Id.eq(file_id))
            .filter(artwork_file::Column::OrderId.eq(order_id))
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Artwork file", file_id));
        }
        Ok(())
    }

    pub async fn list_attachments(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<attachment::Model>, ServiceError> {
        self.ensure_order(order_id).await?;
        Ok(attachment::Entity::find()
            .filter(attachment::Column::OrderId.eq(order_id))
            .order_by_desc(attachment::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, request), fields(file_name = %request.file_name))]
    pub async fn add_attachment(
        &self,
        order_id: Uuid,
        request: NewFileRequest,
        uploaded_by: Option<Uuid>,
    ) -> Result<attachment::Model, ServiceError> {
        request.validate()?;
        self.ensure_order(order_id).await?;
        Ok(attachment::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            file_name: Set(request.file_name),
            original_name: Set(request.original_name),
            file_path: Set(request.file_path),
            mime_type: Set(request.mime_type),
            file_size: Set(request.file_size),
            category: Set(request.category),
            uploaded_by: Set(uploaded_by),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_attachment(
        &self,
        order_id: Uuid,
        attachment_id: Uuid,
    ) -> Result<(), ServiceError> {
        let result = attachment::Entity::delete_many()
            .filter(attachment::Column::Id.eq(attachment_id))
            .filter(attachment::Column::OrderId.eq(order_id))
            .exec(&*self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Attachment", attachment_id));
        }
        Ok(())
    }

    pub async fn list_communications(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<communication::Model>, ServiceError> {
        self.ensure_order(order_id).await?;
        Ok(communication::Entity::find()
            .filter(communication::Column::OrderId.eq(order_id))
            .order_by_desc(communication::Column::SentAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, request))]
    pub async fn log_communication(
        &self,
        order_id: Uuid,
        request: CreateCommunicationRequest,
        user_id: Option<Uuid>,
    ) -> Result<communication::Model, ServiceError> {
        request.validate()?;
        let order = self.ensure_order(order_id).await?;
        let model = communication::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(Some(order_id)),
            company_id: Set(Some(order.company_id)),
            user_id: Set(user_id),
            kind: Set(request.kind),
            direction: Set(request.direction),
            subject: Set(request.subject),
            body: Set(request.body),
            recipient: Set(request.recipient),
            sent_at: Set(request.sent_at.unwrap_or_else(Utc::now)),
        }
        .insert(&*self.db)
        .await?;
        info!(communication_id = %model.id, kind = %model.kind, "Communication logged");
        Ok(model)
    }
}
