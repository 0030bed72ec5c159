use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{ok, ActingUser};
use crate::{entities::notification, ApiResponse, ApiResult, AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCount {
    pub unread: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkedRead {
    pub updated: u64,
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    summary = "Notifications for the acting user",
    params(NotificationQuery, ("x-user-id" = Uuid, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Newest first", body = ApiResponse<Vec<notification::Model>>),
        (status = 400, description = "Missing x-user-id", body = crate::errors::ErrorResponse),
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: ActingUser,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Vec<notification::Model>> {
    let user_id = user.require()?;
    let limit = state.config.page_size(query.limit);
    Ok(ok(state
        .services
        .notifications
        .list_for_user(user_id, query.unread_only, limit)
        .await?))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    params(("x-user-id" = Uuid, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Unread notifications", body = ApiResponse<UnreadCount>),
        (status = 400, description = "Missing x-user-id", body = crate::errors::ErrorResponse),
    ),
    tag = "notifications"
)]
pub async fn unread_count(
    State(state): State<AppState>,
    user: ActingUser,
) -> ApiResult<UnreadCount> {
    let unread = state
        .services
        .notifications
        .unread_count(user.require()?)
        .await?;
    Ok(ok(UnreadCount { unread }))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification marked read", body = ApiResponse<notification::Model>),
        (status = 404, description = "Notification not found", body = crate::errors::ErrorResponse),
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<notification::Model> {
    Ok(ok(state.services.notifications.mark_read(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    params(("x-user-id" = Uuid, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Number of notifications marked read", body = ApiResponse<MarkedRead>),
        (status = 400, description = "Missing x-user-id", body = crate::errors::ErrorResponse),
    ),
    tag = "notifications"
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: ActingUser,
) -> ApiResult<MarkedRead> {
    let updated = state
        .services
        .notifications
        .mark_all_read(user.require()?)
        .await?;
    Ok(ok(MarkedRead { updated }))
}
