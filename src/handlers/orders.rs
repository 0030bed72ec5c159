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
    entities::{activity, artwork_file, attachment, communication, order},
    errors::ServiceError,
    services::{
        order_records::{CreateCommunicationRequest, NewFileRequest},
        orders::{
            CreateOrderRequest, OrderDetails, OrderFilter, OrderItemInput, UpdateOrderItemRequest,
            UpdateOrderRequest, UpdateOrderStatusRequest,
        },
        reconciliation::ReconcileReport,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// One of the order status values, e.g. `in_production`.
    pub status: Option<String>,
    pub company_id: Option<Uuid>,
    pub assigned_user_id: Option<Uuid>,
    /// Matches anywhere in the order number.
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReconcileQuery {
    /// Report drift without writing anything.
    #[serde(default)]
    pub dry_run: bool,
}

#[utoipa::path(
    get,
    path = "/api/orders",
    summary = "List orders",
    description = "Newest first, filtered by status, company, assignee or order number.",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<PaginatedResponse<order::Model>>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<PaginatedResponse<order::Model>> {
    let (page, limit) = page_window(&state.config, query.page, query.limit);
    let filter = OrderFilter {
        status: query.status,
        company_id: query.company_id,
        assigned_user_id: query.assigned_user_id,
        search: query.search,
    };
    let (items, total) = state.services.orders.list(filter, page, limit).await?;
    Ok(paginated(items, total, page, limit))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    summary = "Get order",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with its line items", body = ApiResponse<OrderDetails>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderDetails> {
    Ok(ok(state.services.orders.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/by-number/{order_number}",
    summary = "Get order by number",
    params(("order_number" = String, Path, description = "Order number, e.g. ORD-20240501-000042")),
    responses(
        (status = 200, description = "Order with its line items", body = ApiResponse<OrderDetails>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order_by_number(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> ApiResult<OrderDetails> {
    Ok(ok(state.services.orders.get_by_number(&order_number).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    summary = "Create order",
    description = "Creates an order with its line items. Totals are computed server side and the order number is generated when omitted.",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderDetails>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Company or product not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order number already used", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: ActingUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDetails>>), ServiceError> {
    let details = state.services.orders.create(payload, user.id()).await?;
    Ok(created(details))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    summary = "Update order",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderDetails>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
    Json(payload): Json<UpdateOrderRequest>,
) -> ApiResult<OrderDetails> {
    Ok(ok(state.services.orders.update(id, payload, user.id()).await?))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    summary = "Change order status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<order::Model>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> ApiResult<order::Model> {
    let order = state
        .services
        .orders
        .update_status(id, &payload.status, user.id())
        .await?;
    Ok(ok(order))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    summary = "Delete order",
    description = "Removes the order with its items, files and communications.",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
) -> Result<StatusCode, ServiceError> {
    state.services.orders.delete(id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/items",
    summary = "Add line item",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = OrderItemInput,
    responses(
        (status = 201, description = "Item added, totals recomputed", body = ApiResponse<OrderDetails>),
        (status = 404, description = "Order or product not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn add_order_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
    Json(payload): Json<OrderItemInput>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDetails>>), ServiceError> {
    let details = state.services.orders.add_item(id, payload, user.id()).await?;
    Ok(created(details))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/items/{item_id}",
    summary = "Update line item",
    params(
        ("id" = Uuid, Path, description = "Order id"),
        ("item_id" = Uuid, Path, description = "Line item id"),
    ),
    request_body = UpdateOrderItemRequest,
    responses(
        (status = 200, description = "Item updated, totals recomputed", body = ApiResponse<OrderDetails>),
        (status = 404, description = "Order or item not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    user: ActingUser,
    Json(payload): Json<UpdateOrderItemRequest>,
) -> ApiResult<OrderDetails> {
    let details = state
        .services
        .orders
        .update_item(id, item_id, payload, user.id())
        .await?;
    Ok(ok(details))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/items/{item_id}",
    summary = "Remove line item",
    params(
        ("id" = Uuid, Path, description = "Order id"),
        ("item_id" = Uuid, Path, description = "Line item id"),
    ),
    responses(
        (status = 200, description = "Item removed, totals recomputed", body = ApiResponse<OrderDetails>),
        (status = 404, description = "Order or item not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn remove_order_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    user: ActingUser,
) -> ApiResult<OrderDetails> {
    let details = state
        .services
        .orders
        .remove_item(id, item_id, user.id())
        .await?;
    Ok(ok(details))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/activities",
    summary = "Order activity log",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Newest first", body = ApiResponse<Vec<activity::Model>>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn list_order_activities(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<activity::Model>> {
    Ok(ok(state.services.orders.list_activities(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders/reconcile",
    summary = "Reconcile stored totals",
    description = "Recomputes line and order totals and repairs rows that drifted.",
    params(ReconcileQuery),
    responses(
        (status = 200, description = "Reconciliation report", body = ApiResponse<ReconcileReport>),
    ),
    tag = "orders"
)]
pub async fn reconcile_totals(
    State(state): State<AppState>,
    Query(query): Query<ReconcileQuery>,
) -> ApiResult<ReconcileReport> {
    Ok(ok(state.services.reconciliation.reconcile(query.dry_run).await?))
}

// Order records: artwork files, attachments and the communication log.

#[utoipa::path(
    get,
    path = "/api/orders/{id}/artwork",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Artwork files", body = ApiResponse<Vec<artwork_file::Model>>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "order-records"
)]
pub async fn list_order_artwork(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<artwork_file::Model>> {
    Ok(ok(state.services.order_records.list_artwork_for_order(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/artwork",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = NewFileRequest,
    responses(
        (status = 201, description = "Artwork recorded", body = ApiResponse<artwork_file::Model>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "order-records"
)]
pub async fn add_order_artwork(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
    Json(payload): Json<NewFileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<artwork_file::Model>>), ServiceError> {
    let file = state
        .services
        .order_records
        .add_artwork(id, payload, user.id())
        .await?;
    Ok(created(file))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/artwork/{file_id}",
    params(
        ("id" = Uuid, Path, description = "Order id"),
        ("file_id" = Uuid, Path, description = "Artwork file id"),
    ),
    responses(
        (status = 204, description = "Artwork removed"),
        (status = 404, description = "File not found on this order", body = crate::errors::ErrorResponse),
    ),
    tag = "order-records"
)]
pub async fn delete_order_artwork(
    State(state): State<AppState>,
    Path((id, file_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServiceError> {
    state.services.order_records.delete_artwork(id, file_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/attachments",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Attachments", body = ApiResponse<Vec<attachment::Model>>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "order-records"
)]
pub async fn list_order_attachments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<attachment::Model>> {
    Ok(ok(state.services.order_records.list_attachments(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/attachments",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = NewFileRequest,
    responses(
        (status = 201, description = "Attachment recorded", body = ApiResponse<attachment::Model>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "order-records"
)]
pub async fn add_order_attachment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
    Json(payload): Json<NewFileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<attachment::Model>>), ServiceError> {
    let file = state
        .services
        .order_records
        .add_attachment(id, payload, user.id())
        .await?;
    Ok(created(file))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/attachments/{attachment_id}",
    params(
        ("id" = Uuid, Path, description = "Order id"),
        ("attachment_id" = Uuid, Path, description = "Attachment id"),
    ),
    responses(
        (status = 204, description = "Attachment removed"),
        (status = 404, description = "Attachment not found on this order", body = crate::errors::ErrorResponse),
    ),
    tag = "order-records"
)]
pub async fn delete_order_attachment(
    State(state): State<AppState>,
    Path((id, attachment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServiceError> {
    state
        .services
        .order_records
        .delete_attachment(id, attachment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/communications",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Communication log, newest first", body = ApiResponse<Vec<communication::Model>>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "order-records"
)]
pub async fn list_order_communications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<communication::Model>> {
    Ok(ok(state.services.order_records.list_communications(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/communications",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = CreateCommunicationRequest,
    responses(
        (status = 201, description = "Communication logged", body = ApiResponse<communication::Model>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "order-records"
)]
pub async fn log_order_communication(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
    Json(payload): Json<CreateCommunicationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<communication::Model>>), ServiceError> {
    let entry = state
        .services
        .order_records
        .log_communication(id, payload, user.id())
        .await?;
    Ok(created(entry))
}
