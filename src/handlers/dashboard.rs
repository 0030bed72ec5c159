use axum::extract::{Query, State};
use serde::Deserialize;
use utoipa::IntoParams;

use super::common::ok;
use crate::{
    entities::order,
    services::{
        dashboard::{DashboardStats, TeamMemberPerformance},
        integrations::{integrations_status, IntegrationsReport},
    },
    ApiResponse, ApiResult, AppState,
};

const RECENT_ORDERS_DEFAULT: u64 = 10;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentOrdersQuery {
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    summary = "Dashboard figures",
    description = "Revenue, order counts and pipeline figures. Cancelled orders do not count as revenue.",
    responses((status = 200, description = "Dashboard stats", body = ApiResponse<DashboardStats>)),
    tag = "dashboard"
)]
pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    Ok(ok(state.services.dashboard.stats().await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/team-performance",
    responses((status = 200, description = "Per user revenue, highest first", body = ApiResponse<Vec<TeamMemberPerformance>>)),
    tag = "dashboard"
)]
pub async fn team_performance(
    State(state): State<AppState>,
) -> ApiResult<Vec<TeamMemberPerformance>> {
    Ok(ok(state.services.dashboard.team_performance().await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/recent-orders",
    params(RecentOrdersQuery),
    responses((status = 200, description = "Newest orders", body = ApiResponse<Vec<order::Model>>)),
    tag = "dashboard"
)]
pub async fn recent_orders(
    State(state): State<AppState>,
    Query(query): Query<RecentOrdersQuery>,
) -> ApiResult<Vec<order::Model>> {
    let limit = state
        .config
        .page_size(Some(query.limit.unwrap_or(RECENT_ORDERS_DEFAULT)));
    Ok(ok(state.services.dashboard.recent_orders(limit).await?))
}

#[utoipa::path(
    get,
    path = "/api/integrations/status",
    summary = "Integration configuration",
    description = "Which third-party integrations have credentials configured. Credential values are never returned.",
    responses((status = 200, description = "Integration status", body = ApiResponse<IntegrationsReport>)),
    tag = "dashboard"
)]
pub async fn integration_status(State(state): State<AppState>) -> ApiResult<IntegrationsReport> {
    Ok(ok(integrations_status(&state.config)))
}
