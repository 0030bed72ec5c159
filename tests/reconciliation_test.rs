mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, money, TestApp};
use rust_decimal_macros::dec;
use sea_orm::{sea_query::Expr, ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;
use swagsuite_api::entities::{order, order_item};
use uuid::Uuid;

/// Creates a consistent order (200.00 + 12.50 tax + 20.25 shipping) and
/// then corrupts its stored line and order totals.
async fn drifted_order(app: &TestApp) -> Uuid {
    let company = app.create_company("Drift Works").await;
    let supplier = app.create_supplier("Alpha Broder").await;
    let product = app.create_product(supplier, "Beanie", "2.50").await;
    let body = app
        .create_order(json!({
            "company_id": company,
            "shipping": "20.25",
            "items": [{ "product_id": product, "quantity": 80, "unit_price": "2.50" }],
        }))
        .await;
    let id = id_of(&body);

    let db = &*app.state.db;
    order_item::Entity::update_many()
        .col_expr(order_item::Column::TotalPrice, Expr::value(dec!(150)))
        .filter(order_item::Column::OrderId.eq(id))
        .exec(db)
        .await
        .unwrap();
    order::Entity::update_many()
        .col_expr(order::Column::Subtotal, Expr::value(dec!(150)))
        .col_expr(order::Column::Total, Expr::value(dec!(182.75)))
        .filter(order::Column::Id.eq(id))
        .exec(db)
        .await
        .unwrap();
    id
}

#[tokio::test]
async fn dry_run_reports_without_writing() {
    let app = TestApp::new().await;
    let id = drifted_order(&app).await;

    let (status, report) = app
        .request(Method::POST, "/api/orders/reconcile?dry_run=true", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &report["data"];
    assert_eq!(data["dry_run"], true);
    assert_eq!(data["orders_scanned"], 1);
    assert_eq!(data["orders_repaired"], 1);
    assert_eq!(data["items_repaired"], 1);
    assert_eq!(money(&data["repairs"][0]["subtotal_before"]), 150.0);
    assert_eq!(money(&data["repairs"][0]["subtotal_after"]), 200.0);
    assert_eq!(money(&data["repairs"][0]["total_after"]), 232.75);

    let (_, order) = app
        .request(Method::GET, &format!("/api/orders/{id}"), None)
        .await;
    assert_eq!(money(&order["data"]["subtotal"]), 150.0);
}

#[tokio::test]
async fn repair_fixes_totals_and_is_idempotent() {
    let app = TestApp::new().await;
    let id = drifted_order(&app).await;

    let (status, report) = app
        .request(Method::POST, "/api/orders/reconcile", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["data"]["dry_run"], false);
    assert_eq!(report["data"]["orders_repaired"], 1);

    let (_, order) = app
        .request(Method::GET, &format!("/api/orders/{id}"), None)
        .await;
    let data = &order["data"];
    assert_eq!(money(&data["subtotal"]), 200.0);
    assert_eq!(money(&data["tax"]), 12.5);
    assert_eq!(money(&data["total"]), 232.75);
    assert_eq!(money(&data["items"][0]["total_price"]), 200.0);

    let (_, activities) = app
        .request(Method::GET, &format!("/api/orders/{id}/activities"), None)
        .await;
    assert!(activities["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["action"] == "totals_reconciled"));

    let (_, rerun) = app
        .request(Method::POST, "/api/orders/reconcile", None)
        .await;
    assert_eq!(rerun["data"]["orders_scanned"], 1);
    assert_eq!(rerun["data"]["orders_repaired"], 0);
    assert_eq!(rerun["data"]["repairs"], json!([]));
}

#[tokio::test]
async fn service_can_run_without_an_event_channel() {
    let app = TestApp::new().await;
    drifted_order(&app).await;

    let service = swagsuite_api::services::reconciliation::ReconciliationService::new(
        app.state.db.clone(),
        None,
    );
    let report = service.reconcile(false).await.unwrap();
    assert_eq!(report.orders_repaired, 1);
    assert_eq!(report.items_repaired, 1);
    assert!(service.reconcile(true).await.unwrap().repairs.is_empty());
}
