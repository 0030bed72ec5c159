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
    entities::user::{self, UserRole},
    errors::ServiceError,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, active_only: bool) -> Result<Vec<user::Model>, ServiceError> {
        let mut query = user::Entity::find().order_by_asc(user::Column::Username);
        if active_only {
            query = query.filter(user::Column::IsActive.eq(true));
        }
        Ok(query.all(&*self.db).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<user::Model, ServiceError> {
        request.validate()?;
        let db = &*self.db;

        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(request.username.as_str()))
            .count(db)
            .await?;
        if taken > 0 {
            return Err(ServiceError::Conflict(format!(
                "Username {} is already taken",
                request.username
            )));
        }

        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(request.username),
            email: Set(request.email),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            role: Set(request.role.unwrap_or(UserRole::SalesRep)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        info!(user_id = %model.id, "User created");
        Ok(model)
    }
}
