use chrono::Utc;
use sea_orm::{entity::*, query::*, ConnectionTrait};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::{db::DbPool, entities::activity, errors::ServiceError};

/// An audit entry waiting to be written.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<Uuid>,
    pub entity_type: &'static str,
    pub entity_id: Uuid,
    pub action: &'static str,
    pub description: String,
    pub metadata: Option<Value>,
}

impl NewActivity {
    pub fn new(
        entity_type: &'static str,
        entity_id: Uuid,
        action: &'static str,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id: None,
            entity_type,
            entity_id,
            action,
            description: description.into(),
            metadata: None,
        }
    }

    pub fn by(mut self, user_id: Option<Uuid>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Append-only audit trail. Rows are never updated or deleted.
#[derive(Clone)]
pub struct ActivityService {
    db: Arc<DbPool>,
}

impl ActivityService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Writes an activity on `conn`, which may be an open transaction so the
    /// entry commits or rolls back with the change it describes.
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        entry: NewActivity,
    ) -> Result<activity::Model, ServiceError> {
        let model = activity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(entry.user_id),
            entity_type: Set(entry.entity_type.to_string()),
            entity_id: Set(entry.entity_id),
            action: Set(entry.action.to_string()),
            description: Set(entry.description),
            metadata: Set(entry.metadata.map(|m| m.to_string())),
            created_at: Set(Utc::now()),
        };
        model.insert(conn).await.map_err(|e| {
            error!(error = %e, entity_id = %entry.entity_id, "Failed to record activity");
            ServiceError::from(e)
        })
    }

    #[instrument(skip(self))]
    pub async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<activity::Model>, ServiceError> {
        Ok(activity::Entity::find()
            .filter(activity::Column::EntityType.eq(entity_type))
            .filter(activity::Column::EntityId.eq(entity_id))
            .order_by_desc(activity::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn recent(&self, limit: u64) -> Result<Vec<activity::Model>, ServiceError> {
        Ok(activity::Entity::find()
            .order_by_desc(activity::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await?)
    }
}
