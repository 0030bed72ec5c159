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
    entities::supplier,
    errors::ServiceError,
    services::suppliers::{CreateSupplierRequest, UpdateSupplierRequest},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SupplierListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    #[serde(default)]
    pub preferred_only: bool,
}

#[utoipa::path(
    get,
    path = "/api/suppliers",
    params(SupplierListQuery),
    responses(
        (status = 200, description = "Suppliers", body = ApiResponse<PaginatedResponse<supplier::Model>>),
    ),
    tag = "suppliers"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(query): Query<SupplierListQuery>,
) -> ApiResult<PaginatedResponse<supplier::Model>> {
    let (page, limit) = page_window(&state.config, query.page, query.limit);
    let (items, total) = state
        .services
        .suppliers
        .list(query.search, query.preferred_only, page, limit)
        .await?;
    Ok(paginated(items, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    params(("id" = Uuid, Path, description = "Supplier id")),
    responses(
        (status = 200, description = "Supplier", body = ApiResponse<supplier::Model>),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
    ),
    tag = "suppliers"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<supplier::Model> {
    Ok(ok(state.services.suppliers.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = ApiResponse<supplier::Model>),
        (status = 409, description = "Name already used", body = crate::errors::ErrorResponse),
    ),
    tag = "suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<ApiResponse<supplier::Model>>), ServiceError> {
    Ok(created(state.services.suppliers.create(payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    params(("id" = Uuid, Path, description = "Supplier id")),
    request_body = UpdateSupplierRequest,
    responses(
        (status = 200, description = "Supplier updated", body = ApiResponse<supplier::Model>),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
    ),
    tag = "suppliers"
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> ApiResult<supplier::Model> {
    Ok(ok(state.services.suppliers.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    params(("id" = Uuid, Path, description = "Supplier id")),
    responses(
        (status = 204, description = "Supplier deleted"),
        (status = 404, description = "Supplier not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Supplier still has products", body = crate::errors::ErrorResponse),
    ),
    tag = "suppliers"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.suppliers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
