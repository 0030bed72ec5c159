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
    entities::lead,
    errors::ServiceError,
    services::leads::{
        parse_lead_status, ConvertLeadRequest, CreateLeadRequest, LeadConversion,
        UpdateLeadRequest,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeadListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/leads",
    params(LeadListQuery),
    responses(
        (status = 200, description = "Leads, newest first", body = ApiResponse<PaginatedResponse<lead::Model>>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
    ),
    tag = "leads"
)]
pub async fn list_leads(
    State(state): State<AppState>,
    Query(query): Query<LeadListQuery>,
) -> ApiResult<PaginatedResponse<lead::Model>> {
    let (page, limit) = page_window(&state.config, query.page, query.limit);
    let status = query.status.as_deref().map(parse_lead_status).transpose()?;
    let (items, total) = state
        .services
        .leads
        .list(status, query.search, page, limit)
        .await?;
    Ok(paginated(items, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    params(("id" = Uuid, Path, description = "Lead id")),
    responses(
        (status = 200, description = "Lead", body = ApiResponse<lead::Model>),
        (status = 404, description = "Lead not found", body = crate::errors::ErrorResponse),
    ),
    tag = "leads"
)]
pub async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<lead::Model> {
    Ok(ok(state.services.leads.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/leads",
    request_body = CreateLeadRequest,
    responses(
        (status = 201, description = "Lead created", body = ApiResponse<lead::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    ),
    tag = "leads"
)]
pub async fn create_lead(
    State(state): State<AppState>,
    Json(payload): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<ApiResponse<lead::Model>>), ServiceError> {
    Ok(created(state.services.leads.create(payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    params(("id" = Uuid, Path, description = "Lead id")),
    request_body = UpdateLeadRequest,
    responses(
        (status = 200, description = "Lead updated", body = ApiResponse<lead::Model>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Lead not found", body = crate::errors::ErrorResponse),
    ),
    tag = "leads"
)]
pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadRequest>,
) -> ApiResult<lead::Model> {
    Ok(ok(state.services.leads.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    params(("id" = Uuid, Path, description = "Lead id")),
    responses(
        (status = 204, description = "Lead deleted"),
        (status = 404, description = "Lead not found", body = crate::errors::ErrorResponse),
    ),
    tag = "leads"
)]
pub async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.leads.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/leads/{id}/convert",
    summary = "Convert lead",
    description = "Creates a company and a primary contact from the lead and marks it converted.",
    params(("id" = Uuid, Path, description = "Lead id")),
    request_body = ConvertLeadRequest,
    responses(
        (status = 201, description = "Lead converted", body = ApiResponse<LeadConversion>),
        (status = 404, description = "Lead not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Lead already converted", body = crate::errors::ErrorResponse),
    ),
    tag = "leads"
)]
pub async fn convert_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
    payload: Option<Json<ConvertLeadRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LeadConversion>>), ServiceError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let conversion = state.services.leads.convert(id, request, user.id()).await?;
    Ok(created(conversion))
}
