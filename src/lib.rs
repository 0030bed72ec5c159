//! SwagSuite API library
//!
//! Order management, CRM, catalog and production tooling for a
//! promotional-products distributor, served over a JSON HTTP API.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod models;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    extract::State,
    http::HeaderValue,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer};
use utoipa::ToSchema;

use crate::{config::AppConfig, db::DbPool, events::EventSender, handlers::AppServices};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub event_sender: Option<Arc<EventSender>>,
    pub services: AppServices,
}

impl AppState {
    /// Wires every service against the same pool and event channel.
    pub fn new(db: Arc<DbPool>, config: AppConfig, event_sender: Option<Arc<EventSender>>) -> Self {
        let services = AppServices::new(db.clone(), event_sender.clone(), &config);
        Self {
            db,
            config,
            event_sender,
            services,
        }
    }
}

// Common response wrappers
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[test]
    fn message_is_omitted_unless_set() {
        let plain = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert!(plain.get("message").is_none());
        assert_eq!(plain["success"], true);

        let noted = serde_json::to_value(ApiResponse::success(1).with_message("done")).unwrap();
        assert_eq!(noted["message"], "done");
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PaginatedResponse::new(vec![1, 2], 41, 1, 20);
        assert_eq!(page.total_pages, 3);
        assert_eq!(PaginatedResponse::<u8>::new(vec![], 0, 1, 20).total_pages, 0);
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Every JSON route, mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    use handlers::{
        activities, artwork, companies, contacts, dashboard, leads, mockups, notifications,
        orders, products, sequences, suppliers, users,
    };

    let order_routes = Router::new()
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route("/orders/reconcile", post(orders::reconcile_totals))
        .route(
            "/orders/by-number/:order_number",
            get(orders::get_order_by_number),
        )
        .route(
            "/orders/:id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/orders/:id/status", put(orders::update_order_status))
        .route("/orders/:id/items", post(orders::add_order_item))
        .route(
            "/orders/:id/items/:item_id",
            put(orders::update_order_item).delete(orders::remove_order_item),
        )
        .route("/orders/:id/activities", get(orders::list_order_activities))
        .route(
            "/orders/:id/artwork",
            get(orders::list_order_artwork).post(orders::add_order_artwork),
        )
        .route(
            "/orders/:id/artwork/:file_id",
            axum::routing::delete(orders::delete_order_artwork),
        )
        .route(
            "/orders/:id/attachments",
            get(orders::list_order_attachments).post(orders::add_order_attachment),
        )
        .route(
            "/orders/:id/attachments/:attachment_id",
            axum::routing::delete(orders::delete_order_attachment),
        )
        .route(
            "/orders/:id/communications",
            get(orders::list_order_communications).post(orders::log_order_communication),
        );

    let crm_routes = Router::new()
        .route(
            "/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/companies/:id",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route("/companies/:id/contacts", get(companies::list_company_contacts))
        .route("/companies/:id/artwork", get(companies::list_company_artwork))
        .route(
            "/companies/:id/activities",
            get(companies::list_company_activities),
        )
        .route(
            "/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route(
            "/contacts/:id",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .route("/leads", get(leads::list_leads).post(leads::create_lead))
        .route(
            "/leads/:id",
            get(leads::get_lead)
                .put(leads::update_lead)
                .delete(leads::delete_lead),
        )
        .route("/leads/:id/convert", post(leads::convert_lead))
        .route(
            "/suppliers",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route(
            "/suppliers/:id",
            get(suppliers::get_supplier)
                .put(suppliers::update_supplier)
                .delete(suppliers::delete_supplier),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", get(users::get_user));

    let catalog_routes = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/product-categories",
            get(products::list_categories).post(products::create_category),
        );

    let production_routes = Router::new()
        .route("/artwork/board", get(artwork::get_board))
        .route("/artwork/columns", post(artwork::create_column))
        .route("/artwork/columns/reorder", put(artwork::reorder_columns))
        .route(
            "/artwork/columns/:id",
            put(artwork::update_column).delete(artwork::delete_column),
        )
        .route("/artwork/cards", post(artwork::create_card))
        .route(
            "/artwork/cards/:id",
            get(artwork::get_card)
                .put(artwork::update_card)
                .delete(artwork::delete_card),
        )
        .route("/artwork/cards/:id/move", put(artwork::move_card))
        .route(
            "/mockups",
            get(mockups::list_mockups).post(mockups::create_mockup),
        )
        .route(
            "/mockups/:id",
            get(mockups::get_mockup)
                .put(mockups::update_mockup)
                .delete(mockups::delete_mockup),
        )
        .route("/mockups/:id/logos", post(mockups::add_logo))
        .route(
            "/mockups/:id/logos/:logo_id",
            put(mockups::update_logo).delete(mockups::remove_logo),
        )
        .route(
            "/mockups/:id/logos/:logo_id/remove-background",
            post(mockups::remove_background),
        )
        .route(
            "/mockups/:id/logos/:logo_id/color",
            post(mockups::apply_color),
        )
        .route(
            "/sequences",
            get(sequences::list_sequences).post(sequences::create_sequence),
        )
        .route(
            "/sequences/:id",
            get(sequences::get_sequence)
                .put(sequences::update_sequence)
                .delete(sequences::delete_sequence),
        )
        .route("/sequences/:id/steps", put(sequences::replace_steps))
        .route("/sequences/:id/analytics", get(sequences::sequence_analytics))
        .route(
            "/sequences/:id/enrollments",
            get(sequences::list_enrollments).post(sequences::enroll_contact),
        )
        .route("/sequence-enrollments/due", get(sequences::due_enrollments))
        .route(
            "/sequence-enrollments/:id/advance",
            post(sequences::advance_enrollment),
        )
        .route(
            "/sequence-enrollments/:id/stop",
            post(sequences::stop_enrollment),
        );

    let feed_routes = Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route("/notifications/read-all", put(notifications::mark_all_read))
        .route("/notifications/:id/read", put(notifications::mark_read))
        .route("/activities", get(activities::recent_activities))
        .route(
            "/activities/:entity_type/:entity_id",
            get(activities::entity_activities),
        )
        .route("/dashboard/stats", get(dashboard::dashboard_stats))
        .route(
            "/dashboard/team-performance",
            get(dashboard::team_performance),
        )
        .route("/dashboard/recent-orders", get(dashboard::recent_orders))
        .route("/integrations/status", get(dashboard::integration_status));

    Router::new()
        .route("/status", get(api_status))
        .merge(order_routes)
        .merge(crm_routes)
        .merge(catalog_routes)
        .merge(production_routes)
        .merge(feed_routes)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    } else if config.should_allow_permissive_cors() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// The full application: health checks, the `/api` tree, Swagger UI and the
/// shared middleware stack.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::<AppState>::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/api/status",
    responses((status = 200, description = "Service status", body = ApiResponse<ServiceStatus>)),
    tag = "system"
)]
pub async fn api_status(State(state): State<AppState>) -> ApiResult<ServiceStatus> {
    Ok(Json(ApiResponse::success(ServiceStatus {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Liveness and database check", body = ApiResponse<HealthStatus>)),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResult<HealthStatus> {
    let database = match db::check_connection(&state.db).await {
        Ok(()) => "healthy",
        Err(e) => {
            ::tracing::warn!(error = %e, "Database health check failed");
            "unhealthy"
        }
    };

    Ok(Json(ApiResponse::success(HealthStatus {
        status: if database == "healthy" { "healthy" } else { "degraded" }.to_string(),
        database: database.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })))
}
