use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::common::{created, ok, page_window, paginated, ActingUser};
use crate::{
    errors::ServiceError,
    models::mockup::LogoTransform,
    services::mockups::{
        AddLogoRequest, ApplyColorRequest, CreateMockupRequest, MockupResponse,
        UpdateMockupRequest,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MockupListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub order_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/mockups",
    params(MockupListQuery),
    responses(
        (status = 200, description = "Mockups, most recently edited first", body = ApiResponse<PaginatedResponse<MockupResponse>>),
    ),
    tag = "mockups"
)]
pub async fn list_mockups(
    State(state): State<AppState>,
    Query(query): Query<MockupListQuery>,
) -> ApiResult<PaginatedResponse<MockupResponse>> {
    let (page, limit) = page_window(&state.config, query.page, query.limit);
    let (items, total) = state
        .services
        .mockups
        .list(query.order_id, page, limit)
        .await?;
    Ok(paginated(items, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/mockups/{id}",
    params(("id" = Uuid, Path, description = "Mockup id")),
    responses(
        (status = 200, description = "Mockup", body = ApiResponse<MockupResponse>),
        (status = 404, description = "Mockup not found", body = crate::errors::ErrorResponse),
    ),
    tag = "mockups"
)]
pub async fn get_mockup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<MockupResponse> {
    Ok(ok(state.services.mockups.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/mockups",
    request_body = CreateMockupRequest,
    responses(
        (status = 201, description = "Mockup created", body = ApiResponse<MockupResponse>),
        (status = 400, description = "Invalid logo placement", body = crate::errors::ErrorResponse),
    ),
    tag = "mockups"
)]
pub async fn create_mockup(
    State(state): State<AppState>,
    user: ActingUser,
    Json(payload): Json<CreateMockupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MockupResponse>>), ServiceError> {
    Ok(created(state.services.mockups.create(payload, user.id()).await?))
}

#[utoipa::path(
    put,
    path = "/api/mockups/{id}",
    params(("id" = Uuid, Path, description = "Mockup id")),
    request_body = UpdateMockupRequest,
    responses(
        (status = 200, description = "Mockup updated", body = ApiResponse<MockupResponse>),
        (status = 404, description = "Mockup not found", body = crate::errors::ErrorResponse),
    ),
    tag = "mockups"
)]
pub async fn update_mockup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMockupRequest>,
) -> ApiResult<MockupResponse> {
    Ok(ok(state.services.mockups.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/mockups/{id}",
    params(("id" = Uuid, Path, description = "Mockup id")),
    responses(
        (status = 204, description = "Mockup deleted"),
        (status = 404, description = "Mockup not found", body = crate::errors::ErrorResponse),
    ),
    tag = "mockups"
)]
pub async fn delete_mockup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.mockups.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/mockups/{id}/logos",
    params(("id" = Uuid, Path, description = "Mockup id")),
    request_body = AddLogoRequest,
    responses(
        (status = 201, description = "Logo placed", body = ApiResponse<MockupResponse>),
        (status = 400, description = "Invalid placement", body = crate::errors::ErrorResponse),
        (status = 404, description = "Mockup not found", body = crate::errors::ErrorResponse),
    ),
    tag = "mockups"
)]
pub async fn add_logo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddLogoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MockupResponse>>), ServiceError> {
    Ok(created(state.services.mockups.add_logo(id, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/mockups/{id}/logos/{logo_id}",
    summary = "Transform logo",
    description = "Applies only the given placement values. Rotation wraps into [0, 360) and opacity is clamped to [0, 1].",
    params(
        ("id" = Uuid, Path, description = "Mockup id"),
        ("logo_id" = Uuid, Path, description = "Logo id"),
    ),
    request_body = LogoTransform,
    responses(
        (status = 200, description = "Logo updated", body = ApiResponse<MockupResponse>),
        (status = 404, description = "Mockup or logo not found", body = crate::errors::ErrorResponse),
    ),
    tag = "mockups"
)]
pub async fn update_logo(
    State(state): State<AppState>,
    Path((id, logo_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<LogoTransform>,
) -> ApiResult<MockupResponse> {
    Ok(ok(state.services.mockups.update_logo(id, logo_id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/mockups/{id}/logos/{logo_id}",
    params(
        ("id" = Uuid, Path, description = "Mockup id"),
        ("logo_id" = Uuid, Path, description = "Logo id"),
    ),
    responses(
        (status = 200, description = "Logo removed", body = ApiResponse<MockupResponse>),
        (status = 404, description = "Mockup or logo not found", body = crate::errors::ErrorResponse),
    ),
    tag = "mockups"
)]
pub async fn remove_logo(
    State(state): State<AppState>,
    Path((id, logo_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<MockupResponse> {
    Ok(ok(state.services.mockups.remove_logo(id, logo_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/mockups/{id}/logos/{logo_id}/remove-background",
    params(
        ("id" = Uuid, Path, description = "Mockup id"),
        ("logo_id" = Uuid, Path, description = "Logo id"),
    ),
    responses(
        (status = 200, description = "Background flagged as removed", body = ApiResponse<MockupResponse>),
        (status = 404, description = "Mockup or logo not found", body = crate::errors::ErrorResponse),
    ),
    tag = "mockups"
)]
pub async fn remove_background(
    State(state): State<AppState>,
    Path((id, logo_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<MockupResponse> {
    Ok(ok(state.services.mockups.remove_background(id, logo_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/mockups/{id}/logos/{logo_id}/color",
    params(
        ("id" = Uuid, Path, description = "Mockup id"),
        ("logo_id" = Uuid, Path, description = "Logo id"),
    ),
    request_body = ApplyColorRequest,
    responses(
        (status = 200, description = "Color applied", body = ApiResponse<MockupResponse>),
        (status = 400, description = "Not a hex color", body = crate::errors::ErrorResponse),
        (status = 404, description = "Mockup or logo not found", body = crate::errors::ErrorResponse),
    ),
    tag = "mockups"
)]
pub async fn apply_color(
    State(state): State<AppState>,
    Path((id, logo_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ApplyColorRequest>,
) -> ApiResult<MockupResponse> {
    Ok(ok(state
        .services
        .mockups
        .apply_color(id, logo_id, &payload.color)
        .await?))
}
