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
    entities::product_category,
    errors::ServiceError,
    services::products::{
        CreateCategoryRequest, CreateProductRequest, ProductResponse, ProductSearch,
        UpdateProductRequest,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Free text over name, sku and description.
    pub q: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[utoipa::path(
    get,
    path = "/api/products",
    summary = "Search the catalog",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Matching products", body = ApiResponse<PaginatedResponse<ProductResponse>>),
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<PaginatedResponse<ProductResponse>> {
    let (page, limit) = page_window(&state.config, query.page, query.limit);
    let search = ProductSearch {
        query: query.q,
        supplier_id: query.supplier_id,
        category_id: query.category_id,
        include_inactive: query.include_inactive,
    };
    let (items, total) = state.services.products.search(search, page, limit).await?;
    Ok(paginated(items, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProductResponse> {
    Ok(ok(state.services.products.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Supplier or category not found", body = crate::errors::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductResponse>>), ServiceError> {
    Ok(created(state.services.products.create(payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> ApiResult<ProductResponse> {
    Ok(ok(state.services.products.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Product is on an order", body = crate::errors::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/product-categories",
    responses((status = 200, description = "Categories by name", body = ApiResponse<Vec<product_category::Model>>)),
    tag = "products"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Vec<product_category::Model>> {
    Ok(ok(state.services.products.list_categories().await?))
}

#[utoipa::path(
    post,
    path = "/api/product-categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<product_category::Model>),
        (status = 409, description = "Name already used", body = crate::errors::ErrorResponse),
    ),
    tag = "products"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<product_category::Model>>), ServiceError> {
    Ok(created(state.services.products.create_category(payload).await?))
}
