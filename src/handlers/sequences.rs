use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::common::{created, ok, page_window, paginated, ActingUser};
use crate::{
    entities::{sequence, sequence_enrollment},
    errors::ServiceError,
    services::sequences::{
        CreateSequenceRequest, EnrollRequest, ReplaceStepsRequest, SequenceAnalytics,
        SequenceDetails, UpdateSequenceRequest,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SequenceListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// `draft`, `active` or `paused`.
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DueQuery {
    /// Defaults to the current time.
    pub now: Option<DateTime<Utc>>,
}

#[utoipa::path(
    get,
    path = "/api/sequences",
    params(SequenceListQuery),
    responses(
        (status = 200, description = "Sequences, newest first", body = ApiResponse<PaginatedResponse<sequence::Model>>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn list_sequences(
    State(state): State<AppState>,
    Query(query): Query<SequenceListQuery>,
) -> ApiResult<PaginatedResponse<sequence::Model>> {
    let (page, limit) = page_window(&state.config, query.page, query.limit);
    let (items, total) = state
        .services
        .sequences
        .list(query.status.as_deref(), page, limit)
        .await?;
    Ok(paginated(items, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/sequences/{id}",
    params(("id" = Uuid, Path, description = "Sequence id")),
    responses(
        (status = 200, description = "Sequence with ordered steps", body = ApiResponse<SequenceDetails>),
        (status = 404, description = "Sequence not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn get_sequence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<SequenceDetails> {
    Ok(ok(state.services.sequences.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sequences",
    request_body = CreateSequenceRequest,
    responses(
        (status = 201, description = "Sequence created", body = ApiResponse<SequenceDetails>),
        (status = 400, description = "Invalid step", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn create_sequence(
    State(state): State<AppState>,
    user: ActingUser,
    Json(payload): Json<CreateSequenceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SequenceDetails>>), ServiceError> {
    Ok(created(state.services.sequences.create(payload, user.id()).await?))
}

#[utoipa::path(
    put,
    path = "/api/sequences/{id}",
    params(("id" = Uuid, Path, description = "Sequence id")),
    request_body = UpdateSequenceRequest,
    responses(
        (status = 200, description = "Sequence updated", body = ApiResponse<SequenceDetails>),
        (status = 404, description = "Sequence not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn update_sequence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSequenceRequest>,
) -> ApiResult<SequenceDetails> {
    Ok(ok(state.services.sequences.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/sequences/{id}",
    params(("id" = Uuid, Path, description = "Sequence id")),
    responses(
        (status = 204, description = "Sequence deleted with its steps and enrollments"),
        (status = 404, description = "Sequence not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn delete_sequence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.sequences.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/sequences/{id}/steps",
    summary = "Replace steps",
    description = "Replaces the whole step list. Active enrollments are rescheduled against the new delays.",
    params(("id" = Uuid, Path, description = "Sequence id")),
    request_body = ReplaceStepsRequest,
    responses(
        (status = 200, description = "Steps replaced", body = ApiResponse<SequenceDetails>),
        (status = 400, description = "Invalid step", body = crate::errors::ErrorResponse),
        (status = 404, description = "Sequence not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn replace_steps(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceStepsRequest>,
) -> ApiResult<SequenceDetails> {
    Ok(ok(state.services.sequences.replace_steps(id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/sequences/{id}/analytics",
    params(("id" = Uuid, Path, description = "Sequence id")),
    responses(
        (status = 200, description = "Step and enrollment figures", body = ApiResponse<SequenceAnalytics>),
        (status = 404, description = "Sequence not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn sequence_analytics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<SequenceAnalytics> {
    Ok(ok(state.services.sequences.analytics(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/sequences/{id}/enrollments",
    params(("id" = Uuid, Path, description = "Sequence id")),
    responses(
        (status = 200, description = "Enrollments", body = ApiResponse<Vec<sequence_enrollment::Model>>),
        (status = 404, description = "Sequence not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<sequence_enrollment::Model>> {
    Ok(ok(state.services.sequences.list_enrollments(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sequences/{id}/enrollments",
    summary = "Enroll contact",
    params(("id" = Uuid, Path, description = "Sequence id")),
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Contact enrolled", body = ApiResponse<sequence_enrollment::Model>),
        (status = 400, description = "Sequence is not active or has no steps", body = crate::errors::ErrorResponse),
        (status = 404, description = "Sequence or contact not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Contact already enrolled", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn enroll_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<ApiResponse<sequence_enrollment::Model>>), ServiceError> {
    let enrollment = state
        .services
        .sequences
        .enroll(id, payload.contact_id)
        .await?;
    Ok(created(enrollment))
}

#[utoipa::path(
    get,
    path = "/api/sequence-enrollments/due",
    summary = "Due enrollments",
    description = "Active enrollments whose next step is due.",
    params(DueQuery),
    responses((status = 200, description = "Due enrollments, oldest first", body = ApiResponse<Vec<sequence_enrollment::Model>>)),
    tag = "sequences"
)]
pub async fn due_enrollments(
    State(state): State<AppState>,
    Query(query): Query<DueQuery>,
) -> ApiResult<Vec<sequence_enrollment::Model>> {
    let now = query.now.unwrap_or_else(Utc::now);
    Ok(ok(state.services.sequences.due(now).await?))
}

#[utoipa::path(
    post,
    path = "/api/sequence-enrollments/{id}/advance",
    params(("id" = Uuid, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment advanced or completed", body = ApiResponse<sequence_enrollment::Model>),
        (status = 400, description = "Enrollment is not active", body = crate::errors::ErrorResponse),
        (status = 404, description = "Enrollment not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn advance_enrollment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<sequence_enrollment::Model> {
    Ok(ok(state.services.sequences.advance(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sequence-enrollments/{id}/stop",
    params(("id" = Uuid, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment stopped", body = ApiResponse<sequence_enrollment::Model>),
        (status = 400, description = "Enrollment already completed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Enrollment not found", body = crate::errors::ErrorResponse),
    ),
    tag = "sequences"
)]
pub async fn stop_enrollment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<sequence_enrollment::Model> {
    Ok(ok(state.services.sequences.stop(id).await?))
}
