use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::common::{created, ok, ActingUser};
use crate::{
    entities::artwork_column,
    errors::ServiceError,
    services::artwork::{
        Board, CardResponse, CreateCardRequest, CreateColumnRequest, MoveCardRequest,
        ReorderRequest, UpdateCardRequest, UpdateColumnRequest,
    },
    ApiResponse, ApiResult, AppState,
};

#[utoipa::path(
    get,
    path = "/api/artwork/board",
    summary = "Kanban board",
    description = "Columns in position order, each with its cards. An empty board is seeded with the default columns.",
    responses((status = 200, description = "Board", body = ApiResponse<Board>)),
    tag = "artwork"
)]
pub async fn get_board(State(state): State<AppState>) -> ApiResult<Board> {
    Ok(ok(state.services.artwork.board().await?))
}

#[utoipa::path(
    post,
    path = "/api/artwork/columns",
    request_body = CreateColumnRequest,
    responses(
        (status = 201, description = "Column appended", body = ApiResponse<artwork_column::Model>),
        (status = 400, description = "Invalid color", body = crate::errors::ErrorResponse),
    ),
    tag = "artwork"
)]
pub async fn create_column(
    State(state): State<AppState>,
    Json(payload): Json<CreateColumnRequest>,
) -> Result<(StatusCode, Json<ApiResponse<artwork_column::Model>>), ServiceError> {
    Ok(created(state.services.artwork.create_column(payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/artwork/columns/{id}",
    params(("id" = Uuid, Path, description = "Column id")),
    request_body = UpdateColumnRequest,
    responses(
        (status = 200, description = "Column updated", body = ApiResponse<artwork_column::Model>),
        (status = 404, description = "Column not found", body = crate::errors::ErrorResponse),
    ),
    tag = "artwork"
)]
pub async fn update_column(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateColumnRequest>,
) -> ApiResult<artwork_column::Model> {
    Ok(ok(state.services.artwork.update_column(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/artwork/columns/{id}",
    params(("id" = Uuid, Path, description = "Column id")),
    responses(
        (status = 204, description = "Column deleted"),
        (status = 404, description = "Column not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Column still has cards", body = crate::errors::ErrorResponse),
    ),
    tag = "artwork"
)]
pub async fn delete_column(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.artwork.delete_column(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/artwork/columns/reorder",
    summary = "Reorder columns",
    description = "The ids must name every column exactly once.",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Columns in their new order", body = ApiResponse<Vec<artwork_column::Model>>),
        (status = 400, description = "Ids do not match the board", body = crate::errors::ErrorResponse),
    ),
    tag = "artwork"
)]
pub async fn reorder_columns(
    State(state): State<AppState>,
    Json(payload): Json<ReorderRequest>,
) -> ApiResult<Vec<artwork_column::Model>> {
    Ok(ok(state.services.artwork.reorder_columns(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/artwork/cards/{id}",
    params(("id" = Uuid, Path, description = "Card id")),
    responses(
        (status = 200, description = "Card", body = ApiResponse<CardResponse>),
        (status = 404, description = "Card not found", body = crate::errors::ErrorResponse),
    ),
    tag = "artwork"
)]
pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<CardResponse> {
    Ok(ok(state.services.artwork.get_card(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/artwork/cards",
    request_body = CreateCardRequest,
    responses(
        (status = 201, description = "Card appended to its column", body = ApiResponse<CardResponse>),
        (status = 400, description = "Unknown priority", body = crate::errors::ErrorResponse),
        (status = 404, description = "Column not found", body = crate::errors::ErrorResponse),
    ),
    tag = "artwork"
)]
pub async fn create_card(
    State(state): State<AppState>,
    user: ActingUser,
    Json(payload): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CardResponse>>), ServiceError> {
    Ok(created(state.services.artwork.create_card(payload, user.id()).await?))
}

#[utoipa::path(
    put,
    path = "/api/artwork/cards/{id}",
    params(("id" = Uuid, Path, description = "Card id")),
    request_body = UpdateCardRequest,
    responses(
        (status = 200, description = "Card updated", body = ApiResponse<CardResponse>),
        (status = 404, description = "Card not found", body = crate::errors::ErrorResponse),
    ),
    tag = "artwork"
)]
pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCardRequest>,
) -> ApiResult<CardResponse> {
    Ok(ok(state.services.artwork.update_card(id, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/artwork/cards/{id}/move",
    summary = "Move card",
    description = "Places the card at a position in the target column and renumbers the affected columns.",
    params(("id" = Uuid, Path, description = "Card id")),
    request_body = MoveCardRequest,
    responses(
        (status = 200, description = "Card moved", body = ApiResponse<CardResponse>),
        (status = 404, description = "Card or column not found", body = crate::errors::ErrorResponse),
    ),
    tag = "artwork"
)]
pub async fn move_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
    Json(payload): Json<MoveCardRequest>,
) -> ApiResult<CardResponse> {
    Ok(ok(state.services.artwork.move_card(id, payload, user.id()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/artwork/cards/{id}",
    params(("id" = Uuid, Path, description = "Card id")),
    responses(
        (status = 204, description = "Card deleted"),
        (status = 404, description = "Card not found", body = crate::errors::ErrorResponse),
    ),
    tag = "artwork"
)]
pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.services.artwork.delete_card(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
