use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::{config::AppConfig, errors::ServiceError, ApiResponse, PaginatedResponse};

/// Header naming the user performing the request. Authentication happens in
/// front of this service; the header is trusted as-is.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting user taken from `x-user-id`, if the caller sent one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActingUser(pub Option<Uuid>);

impl ActingUser {
    pub fn id(&self) -> Option<Uuid> {
        self.0
    }

    /// For operations scoped to a user, such as notifications.
    pub fn require(&self) -> Result<Uuid, ServiceError> {
        self.0
            .ok_or_else(|| ServiceError::BadRequest(format!("{USER_ID_HEADER} header is required")))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Self(None));
        };
        let raw = value
            .to_str()
            .map_err(|_| ServiceError::BadRequest(format!("{USER_ID_HEADER} is not valid text")))?
            .trim();
        if raw.is_empty() {
            return Ok(Self(None));
        }
        Uuid::parse_str(raw)
            .map(|id| Self(Some(id)))
            .map_err(|_| ServiceError::BadRequest(format!("{USER_ID_HEADER} must be a UUID")))
    }
}

/// Resolves the requested page window: pages start at 1 and the size is
/// clamped by configuration.
pub fn page_window(config: &AppConfig, page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    (page.unwrap_or(1).max(1), config.page_size(limit))
}

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

pub fn paginated<T: Serialize>(
    items: Vec<T>,
    total: u64,
    page: u64,
    limit: u64,
) -> Json<ApiResponse<PaginatedResponse<T>>> {
    ok(PaginatedResponse::new(items, total, page, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<ActingUser, ServiceError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        ActingUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn missing_header_is_anonymous() {
        assert_eq!(extract(None).await.unwrap(), ActingUser(None));
        assert_eq!(extract(Some("  ")).await.unwrap(), ActingUser(None));
    }

    #[tokio::test]
    async fn parses_user_id() {
        let id = Uuid::new_v4();
        let user = extract(Some(&id.to_string())).await.unwrap();
        assert_eq!(user.id(), Some(id));
        assert_eq!(user.require().unwrap(), id);
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let err = extract(Some("not-a-uuid")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(ActingUser(None).require().is_err());
    }

    #[test]
    fn page_window_clamps() {
        let cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "development".into(),
        );
        assert_eq!(page_window(&cfg, Some(0), Some(0)), (1, 1));
        assert_eq!(page_window(&cfg, None, Some(10_000)), (1, cfg.api_max_page_size));
    }
}
