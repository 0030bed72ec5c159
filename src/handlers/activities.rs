use axum::extract::{Path, Query, State};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::common::ok;
use crate::{entities::activity, ApiResponse, ApiResult, AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/activities",
    summary = "Recent activity",
    params(RecentQuery),
    responses((status = 200, description = "Newest first", body = ApiResponse<Vec<activity::Model>>)),
    tag = "activities"
)]
pub async fn recent_activities(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Vec<activity::Model>> {
    let limit = state.config.page_size(query.limit);
    Ok(ok(state.services.activities.recent(limit).await?))
}

#[utoipa::path(
    get,
    path = "/api/activities/{entity_type}/{entity_id}",
    params(
        ("entity_type" = String, Path, description = "e.g. order, company, artwork_card"),
        ("entity_id" = Uuid, Path, description = "Entity id"),
    ),
    responses((status = 200, description = "Newest first", body = ApiResponse<Vec<activity::Model>>)),
    tag = "activities"
)]
pub async fn entity_activities(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, Uuid)>,
) -> ApiResult<Vec<activity::Model>> {
    Ok(ok(state
        .services
        .activities
        .list_for_entity(&entity_type, entity_id)
        .await?))
}
