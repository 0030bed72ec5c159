use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::common::{created, ok, page_window, paginated};
use crate::{
    entities::contact,
    errors::ServiceError,
    services::contacts::{ContactFilter, CreateContactRequest, UpdateContactRequest},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub company_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    /// Matches name or email.
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    summary = "List contacts",
    params(ContactListQuery),
    responses(
        (status = 200, description = "Contacts", body = ApiResponse<PaginatedResponse<contact::Model>>),
    ),
    tag = "contacts"
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> ApiResult<PaginatedResponse<contact::Model>> {
    let (page, limit) = page_window(&state.config, query.page, query.limit);
    let filter = ContactFilter {
        company_id: query.company_id,
        supplier_id: query.supplier_id,
        search: query.search,
    };
    let (items, total) = state.services.contacts.list(filter, page, limit).await?;
    Ok(paginated(items, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact", body = ApiResponse<contact::Model>),
        (status = 404, description = "Contact not found", body = crate::errors::ErrorResponse),
    ),
    tag = "contacts"
)]
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<contact::Model> {
    Ok(ok(state.services.contacts.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ApiResponse<contact::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    ),
    tag = "contacts"
)]
pub async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<contact::Model>>), ServiceError> {
    Ok(created(state.services.contacts.create(payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact id")),
    request_body = UpdateContactRequest,
    responses(
        (status = 200, description = "Contact updated", body = ApiResponse<contact::Model>),
        (status = 404, description = "Contact not found", body = crate::errors::ErrorResponse),
    ),
    tag = "contacts"
)]
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContactRequest>,
) -> ApiResult<contact::Model> {
    Ok(ok(state.services.contacts.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact id")),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 404, description = "Contact not found", body = crate::errors::ErrorResponse),
    ),
    tag = "contacts"
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.contacts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
