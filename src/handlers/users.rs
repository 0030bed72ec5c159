use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::common::{created, ok};
use crate::{
    entities::user, errors::ServiceError, services::users::CreateUserRequest, ApiResponse,
    ApiResult, AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Leave out deactivated users.
    #[serde(default)]
    pub active_only: bool,
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListQuery),
    responses((status = 200, description = "Users by username", body = ApiResponse<Vec<user::Model>>)),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Vec<user::Model>> {
    Ok(ok(state.services.users.list(query.active_only).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = ApiResponse<user::Model>),
        (status = 404, description = "User not found", body = crate::errors::ErrorResponse),
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<user::Model> {
    Ok(ok(state.services.users.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<user::Model>),
        (status = 409, description = "Username taken", body = crate::errors::ErrorResponse),
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<user::Model>>), ServiceError> {
    Ok(created(state.services.users.create(payload).await?))
}
