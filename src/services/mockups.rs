use chrono::{DateTime, Utc};
use sea_orm::{entity::*, query::*};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::mockup,
    errors::ServiceError,
    models::mockup::{Logo, LogoTransform, TransformError},
};

impl From<TransformError> for ServiceError {
    fn from(err: TransformError) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = Mockup)]
pub struct MockupResponse {
    pub id: Uuid,
    pub name: String,
    pub product_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub product_image_url: Option<String>,
    pub logos: Vec<Logo>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<mockup::Model> for MockupResponse {
    type Error = ServiceError;

    fn try_from(model: mockup::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            logos: decode_logos(&model.logos)?,
            id: model.id,
            name: model.name,
            product_id: model.product_id,
            order_id: model.order_id,
            product_image_url: model.product_image_url,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

fn decode_logos(raw: &str) -> Result<Vec<Logo>, ServiceError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let logos: Vec<Logo> = serde_json::from_str(raw)?;
    Ok(logos.into_iter().map(Logo::normalized).collect())
}

fn encode_logos(logos: &[Logo]) -> Result<String, ServiceError> {
    Ok(serde_json::to_string(logos)?)
}

/// Validates client supplied logos before they are stored.
fn sanitize_logos(logos: Vec<Logo>) -> Result<Vec<Logo>, ServiceError> {
    logos
        .into_iter()
        .map(|logo| {
            let mut clean = Logo {
                id: logo.id,
                ..Logo::new(logo.image_url, logo.name)
            };
            clean.apply(&LogoTransform {
                x: Some(logo.x),
                y: Some(logo.y),
                width: Some(logo.width),
                height: Some(logo.height),
                rotation: Some(logo.rotation),
                opacity: Some(logo.opacity),
            })?;
            clean.background_removed = logo.background_removed;
            if let Some(color) = logo.applied_color.as_deref() {
                clean.apply_color(color)?;
            }
            Ok(clean)
        })
        .collect()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMockupRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub product_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub product_image_url: Option<String>,
    #[serde(default)]
    pub logos: Vec<Logo>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMockupRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub product_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub product_image_url: Option<String>,
    /// Replaces the whole logo list when present.
    pub logos: Option<Vec<Logo>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddLogoRequest {
    #[validate(length(min = 1))]
    pub image_url: String,
    pub name: Option<String>,
    #[serde(flatten)]
    pub placement: LogoTransform,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyColorRequest {
    #[schema(example = "#1d4ed8")]
    pub color: String,
}

#[derive(Clone)]
pub struct MockupService {
    db: Arc<DbPool>,
}

impl MockupService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        order_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<MockupResponse>, u64), ServiceError> {
        let mut query = mockup::Entity::find().order_by_desc(mockup::Column::UpdatedAt);
        if let Some(order_id) = order_id {
            query = query.filter(mockup::Column::OrderId.eq(order_id));
        }
        let paginator = query.paginate(&*self.db, limit);
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await?
            .into_iter()
            .map(MockupResponse::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn find(&self, id: Uuid) -> Result<mockup::Model, ServiceError> {
        mockup::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Mockup", id))
    }

    pub async fn get(&self, id: Uuid) -> Result<MockupResponse, ServiceError> {
        self.find(id).await?.try_into()
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateMockupRequest,
        created_by: Option<Uuid>,
    ) -> Result<MockupResponse, ServiceError> {
        request.validate()?;
        let logos = sanitize_logos(request.logos)?;
        let now = Utc::now();
        let model = mockup::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            product_id: Set(request.product_id),
            order_id: Set(request.order_id),
            product_image_url: Set(request.product_image_url),
            logos: Set(encode_logos(&logos)?),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db)
        .await?;
        info!(mockup_id = %model.id, logos = logos.len(), "Mockup created");
        model.try_into()
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateMockupRequest,
    ) -> Result<MockupResponse, ServiceError> {
        request.validate()?;
        let mut active: mockup::ActiveModel = self.find(id).await?.into();
        if let Some(v) = request.name {
            active.name = Set(v);
        }
        if let Some(v) = request.product_id {
            active.product_id = Set(Some(v));
        }
        if let Some(v) = request.order_id {
            active.order_id = Set(Some(v));
        }
        if let Some(v) = request.product_image_url {
            active.product_image_url = Set(Some(v));
        }
        if let Some(logos) = request.logos {
            active.logos = Set(encode_logos(&sanitize_logos(logos)?)?);
        }
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?.try_into()
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = mockup::Entity::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Mockup", id));
        }
        Ok(())
    }

    /// Loads the logo list, lets `edit` change it and stores the result.
    async fn edit_logos<F>(&self, id: Uuid, edit: F) -> Result<MockupResponse, ServiceError>
    where
        F: FnOnce(&mut Vec<Logo>) -> Result<(), ServiceError>,
    {
        let model = self.find(id).await?;
        let mut logos = decode_logos(&model.logos)?;
        edit(&mut logos)?;

        let mut active: mockup::ActiveModel = model.into();
        active.logos = Set(encode_logos(&logos)?);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?.try_into()
    }

    /// Places a new logo. Missing placement values use the canvas defaults.
    #[instrument(skip(self, request))]
    pub async fn add_logo(
        &self,
        id: Uuid,
        request: AddLogoRequest,
    ) -> Result<MockupResponse, ServiceError> {
        request.validate()?;
        let mut logo = Logo::new(request.image_url, request.name);
        logo.apply(&request.placement)?;
        self.edit_logos(id, move |logos| {
            logos.push(logo);
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, transform))]
    pub async fn update_logo(
        &self,
        id: Uuid,
        logo_id: Uuid,
        transform: LogoTransform,
    ) -> Result<MockupResponse, ServiceError> {
        self.edit_logos(id, |logos| {
            find_logo(logos, logo_id)?.apply(&transform)?;
            Ok(())
        })
        .await
    }

    /// Marks the logo's background as removed. No image processing happens
    /// here; renderers read the flag.
    #[instrument(skip(self))]
    pub async fn remove_background(
        &self,
        id: Uuid,
        logo_id: Uuid,
    ) -> Result<MockupResponse, ServiceError> {
        self.edit_logos(id, |logos| {
            find_logo(logos, logo_id)?.background_removed = true;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn apply_color(
        &self,
        id: Uuid,
        logo_id: Uuid,
        color: &str,
    ) -> Result<MockupResponse, ServiceError> {
        self.edit_logos(id, |logos| {
            find_logo(logos, logo_id)?.apply_color(color)?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_logo(&self, id: Uuid, logo_id: Uuid) -> Result<MockupResponse, ServiceError> {
        self.edit_logos(id, |logos| {
            let before = logos.len();
            logos.retain(|l| l.id != logo_id);
            if logos.len() == before {
                return Err(ServiceError::not_found("Logo", logo_id));
            }
            Ok(())
        })
        .await
    }
}

fn find_logo(logos: &mut [Logo], logo_id: Uuid) -> Result<&mut Logo, ServiceError> {
    logos
        .iter_mut()
        .find(|l| l.id == logo_id)
        .ok_or_else(|| ServiceError::not_found("Logo", logo_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_stored_logos() {
        let mut logo = Logo::new("logo.png", Some("Front".into()));
        logo.rotation = -45.0;
        logo.opacity = 3.0;
        logo.width = 0.0;
        let id = logo.id;

        let clean = sanitize_logos(vec![logo]).unwrap();
        assert_eq!(clean[0].id, id);
        assert_eq!(clean[0].rotation, 315.0);
        assert_eq!(clean[0].opacity, 1.0);
        assert_eq!(clean[0].width, 1.0);
    }

    #[test]
    fn sanitize_rejects_bad_colors() {
        let mut logo = Logo::new("logo.png", None);
        logo.applied_color = Some("blue".into());
        assert!(matches!(
            sanitize_logos(vec![logo]),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn empty_column_decodes_to_no_logos() {
        assert!(decode_logos("").unwrap().is_empty());
        assert!(decode_logos("[]").unwrap().is_empty());
    }
}
