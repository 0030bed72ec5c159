use chrono::Utc;
use sea_orm::{entity::*, query::*, sea_query::Expr};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::notification::{self, NotificationKind},
    errors::ServiceError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct NotificationService {
    db: Arc<DbPool>,
}

impl NotificationService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, new), fields(user_id = %new.user_id))]
    pub async fn create(&self, new: NewNotification) -> Result<notification::Model, ServiceError> {
        let model = notification::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            title: Set(new.title),
            message: Set(new.message),
            kind: Set(new.kind),
            entity_type: Set(new.entity_type),
            entity_id: Set(new.entity_id),
            is_read: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;
        info!(notification_id = %model.id, "Notification created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: u64,
    ) -> Result<Vec<notification::Model>, ServiceError> {
        let mut query = notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .limit(limit);
        if unread_only {
            query = query.filter(notification::Column::IsRead.eq(false));
        }
        Ok(query.all(&*self.db).await?)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<u64, ServiceError> {
        Ok(notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: Uuid) -> Result<notification::Model, ServiceError> {
        let existing = notification::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notification", id))?;
        if existing.is_read {
            return Ok(existing);
        }
        let mut active: notification::ActiveModel = existing.into();
        active.is_read = Set(true);
        Ok(active.update(&*self.db).await?)
    }

    /// Returns the number of notifications that changed.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, ServiceError> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::UserId.eq(user_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
