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
    entities::{activity, artwork_file, company, contact},
    errors::ServiceError,
    services::{
        companies::{CompanyFilter, CreateCompanyRequest, UpdateCompanyRequest},
        contacts::ContactFilter,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompanyListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Matches name or industry.
    pub search: Option<String>,
    pub industry: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/companies",
    summary = "List companies",
    params(CompanyListQuery),
    responses(
        (status = 200, description = "Companies ordered by name", body = ApiResponse<PaginatedResponse<company::Model>>),
    ),
    tag = "companies"
)]
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<CompanyListQuery>,
) -> ApiResult<PaginatedResponse<company::Model>> {
    let (page, limit) = page_window(&state.config, query.page, query.limit);
    let filter = CompanyFilter {
        search: query.search,
        industry: query.industry,
    };
    let (items, total) = state.services.companies.list(filter, page, limit).await?;
    Ok(paginated(items, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    summary = "Get company",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company", body = ApiResponse<company::Model>),
        (status = 404, description = "Company not found", body = crate::errors::ErrorResponse),
    ),
    tag = "companies"
)]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<company::Model> {
    Ok(ok(state.services.companies.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/companies",
    summary = "Create company",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = ApiResponse<company::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    ),
    tag = "companies"
)]
pub async fn create_company(
    State(state): State<AppState>,
    user: ActingUser,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<company::Model>>), ServiceError> {
    let company = state.services.companies.create(payload, user.id()).await?;
    Ok(created(company))
}

#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    summary = "Update company",
    params(("id" = Uuid, Path, description = "Company id")),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = ApiResponse<company::Model>),
        (status = 404, description = "Company not found", body = crate::errors::ErrorResponse),
    ),
    tag = "companies"
)]
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> ApiResult<company::Model> {
    Ok(ok(state.services.companies.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    summary = "Delete company",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Company still has orders", body = crate::errors::ErrorResponse),
    ),
    tag = "companies"
)]
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
) -> Result<StatusCode, ServiceError> {
    state.services.companies.delete(id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}/contacts",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "Contacts of the company", body = ApiResponse<Vec<contact::Model>>),
        (status = 404, description = "Company not found", body = crate::errors::ErrorResponse),
    ),
    tag = "companies"
)]
pub async fn list_company_contacts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<contact::Model>> {
    state.services.companies.get(id).await?;
    let filter = ContactFilter {
        company_id: Some(id),
        ..Default::default()
    };
    let limit = state.config.api_max_page_size.max(1);
    let (contacts, _) = state.services.contacts.list(filter, 1, limit).await?;
    Ok(ok(contacts))
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}/artwork",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "Artwork files across the company's orders", body = ApiResponse<Vec<artwork_file::Model>>),
        (status = 404, description = "Company not found", body = crate::errors::ErrorResponse),
    ),
    tag = "companies"
)]
pub async fn list_company_artwork(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<artwork_file::Model>> {
    Ok(ok(state.services.order_records.list_artwork_for_company(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}/activities",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company activity log", body = ApiResponse<Vec<activity::Model>>),
        (status = 404, description = "Company not found", body = crate::errors::ErrorResponse),
    ),
    tag = "companies"
)]
pub async fn list_company_activities(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<activity::Model>> {
    state.services.companies.get(id).await?;
    Ok(ok(state
        .services
        .activities
        .list_for_entity("company", id)
        .await?))
}
