#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use swagsuite_api::{
    build_router,
    config::AppConfig,
    db::{self, DbConfig},
    events, AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

/// Application wired against a private in-memory SQLite database, with the
/// event processor running so notifications get written.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.default_tax_rate = 0.0625;

        let pool = db::establish_connection_with_config(&DbConfig::in_memory_sqlite())
            .await
            .expect("failed to open test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_sender, event_rx) = events::channel(256);
        let event_task = tokio::spawn(events::process_events(event_rx, db_arc.clone()));

        let state = AppState::new(db_arc, cfg, Some(event_sender));
        let router = build_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Sends a request without an acting user.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, None).await
    }

    /// Sends a request attributed to `user` through `x-user-id`.
    pub async fn request_as(
        &self,
        user: Uuid,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(&user.to_string())).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        user_header: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user_header {
            builder = builder.header("x-user-id", user);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn create_user(&self, username: &str) -> Uuid {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/users",
                Some(json!({
                    "username": username,
                    "email": format!("{username}@swagsuite.test"),
                    "first_name": "Test",
                    "last_name": username,
                    "role": "sales_rep",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user: {body}");
        id_of(&body)
    }

    pub async fn create_company(&self, name: &str) -> Uuid {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/companies",
                Some(json!({ "name": name, "industry": "Education" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create company: {body}");
        id_of(&body)
    }

    pub async fn create_contact(&self, company_id: Uuid, first_name: &str) -> Uuid {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/contacts",
                Some(json!({
                    "company_id": company_id,
                    "first_name": first_name,
                    "last_name": "Buyer",
                    "email": format!("{}@customer.test", first_name.to_lowercase()),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create contact: {body}");
        id_of(&body)
    }

    pub async fn create_supplier(&self, name: &str) -> Uuid {
        let (status, body) = self
            .request(Method::POST, "/api/suppliers", Some(json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create supplier: {body}");
        id_of(&body)
    }

    pub async fn create_product(&self, supplier_id: Uuid, name: &str, base_price: &str) -> Uuid {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/products",
                Some(json!({
                    "supplier_id": supplier_id,
                    "name": name,
                    "base_price": base_price,
                    "colors": ["Navy", "White"],
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create product: {body}");
        id_of(&body)
    }

    /// Creates an order with a single line and returns the response body.
    pub async fn create_order(&self, body: Value) -> Value {
        let (status, response) = self.request(Method::POST, "/api/orders", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "create order: {response}");
        response
    }

    /// Polls the notification feed until `user` has at least `count`
    /// entries. Notifications are written asynchronously by the event
    /// processor.
    pub async fn wait_for_notifications(&self, user: Uuid, count: usize) -> Vec<Value> {
        for _ in 0..50 {
            let (status, body) = self
                .request_as(user, Method::GET, "/api/notifications", None)
                .await;
            assert_eq!(status, StatusCode::OK);
            let items = body["data"].as_array().cloned().unwrap_or_default();
            if items.len() >= count {
                return items;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("expected {count} notification(s) for {user}");
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

pub fn id_of(body: &Value) -> Uuid {
    body["data"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(|| panic!("response has no data.id: {body}"))
}

/// Money fields serialize as strings; SQLite round trips may also hand
/// back numbers.
pub fn money(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().unwrap_or_else(|_| panic!("not a number: {s}")),
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        other => panic!("not a money value: {other}"),
    }
}
