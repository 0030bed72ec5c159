mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, money, TestApp};
use serde_json::json;
use uuid::Uuid;

struct Fixture {
    company_id: Uuid,
    product_id: Uuid,
}

async fn fixture(app: &TestApp) -> Fixture {
    let company_id = app.create_company("Lakeside High School").await;
    let supplier_id = app.create_supplier("Gildan").await;
    let product_id = app.create_product(supplier_id, "Heavy Cotton Tee", "2.50").await;
    Fixture {
        company_id,
        product_id,
    }
}

#[tokio::test]
async fn creating_an_order_computes_totals_server_side() {
    let app = TestApp::new().await;
    let fx = fixture(&app).await;

    let body = app
        .create_order(json!({
            "company_id": fx.company_id,
            "shipping": "20.25",
            "items": [{
                "product_id": fx.product_id,
                "quantity": 80,
                "unit_price": "2.50",
                "color": "Navy",
            }],
        }))
        .await;

    let data = &body["data"];
    assert!(data["order_number"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(data["status"], "quote");
    assert_eq!(money(&data["subtotal"]), 200.0);
    assert_eq!(money(&data["tax"]), 12.5);
    assert_eq!(money(&data["shipping"]), 20.25);
    assert_eq!(money(&data["total"]), 232.75);
    assert_eq!(data["items"].as_array().unwrap().len(), 1);
    assert_eq!(money(&data["items"][0]["total_price"]), 200.0);

    let id = id_of(&body);
    let (status, fetched) = app
        .request(Method::GET, &format!("/api/orders/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&fetched["data"]["total"]), 232.75);

    let number = data["order_number"].as_str().unwrap();
    let (status, by_number) = app
        .request(Method::GET, &format!("/api/orders/by-number/{number}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_number["data"]["id"], fetched["data"]["id"]);
}

#[tokio::test]
async fn client_supplied_line_totals_are_ignored() {
    let app = TestApp::new().await;
    let fx = fixture(&app).await;

    let body = app
        .create_order(json!({
            "company_id": fx.company_id,
            "tax": "0",
            "items": [{
                "product_id": fx.product_id,
                "quantity": 4,
                "unit_price": "2.50",
                "total_price": "999.00",
            }],
        }))
        .await;

    assert_eq!(money(&body["data"]["items"][0]["total_price"]), 10.0);
    assert_eq!(money(&body["data"]["total"]), 10.0);
}

#[tokio::test]
async fn unknown_company_and_duplicate_numbers_are_rejected() {
    let app = TestApp::new().await;
    let fx = fixture(&app).await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({ "company_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.create_order(json!({ "company_id": fx.company_id, "order_number": "ORD-MANUAL-1" }))
        .await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({ "company_id": fx.company_id, "order_number": "ORD-MANUAL-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn status_changes_are_validated_and_logged() {
    let app = TestApp::new().await;
    let fx = fixture(&app).await;
    let user = app.create_user("jordan").await;

    let body = app
        .create_order(json!({ "company_id": fx.company_id }))
        .await;
    let id = id_of(&body);

    let (status, updated) = app
        .request_as(
            user,
            Method::PUT,
            &format!("/api/orders/{id}/status"),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["status"], "approved");

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/orders/{id}/status"),
            Some(json!({ "status": "on_hold" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, activities) = app
        .request(Method::GET, &format!("/api/orders/{id}/activities"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = activities["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["action"].as_str())
        .collect();
    assert!(actions.contains(&"created"));
    assert!(actions.contains(&"status_changed"));
    let change = activities["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["action"] == "status_changed")
        .unwrap();
    assert_eq!(change["user_id"], json!(user));
}

#[tokio::test]
async fn adding_items_keeps_tax_and_recomputes_total() {
    let app = TestApp::new().await;
    let fx = fixture(&app).await;

    let body = app
        .create_order(json!({
            "company_id": fx.company_id,
            "shipping": "20.25",
            "items": [{ "product_id": fx.product_id, "quantity": 80, "unit_price": "2.50" }],
        }))
        .await;
    let id = id_of(&body);

    let (status, added) = app
        .request(
            Method::POST,
            &format!("/api/orders/{id}/items"),
            Some(json!({ "product_id": fx.product_id, "quantity": 10, "unit_price": "1.25" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let data = &added["data"];
    assert_eq!(data["items"].as_array().unwrap().len(), 2);
    assert_eq!(money(&data["subtotal"]), 212.5);
    assert_eq!(money(&data["tax"]), 12.5);
    assert_eq!(money(&data["total"]), 245.25);

    let item_id = data["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["quantity"] == 10)
        .and_then(|i| i["id"].as_str())
        .unwrap()
        .to_string();
    let (status, removed) = app
        .request(
            Method::DELETE,
            &format!("/api/orders/{id}/items/{item_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&removed["data"]["total"]), 232.75);
}

#[tokio::test]
async fn item_quantity_must_be_positive() {
    let app = TestApp::new().await;
    let fx = fixture(&app).await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({
                "company_id": fx.company_id,
                "items": [{ "product_id": fx.product_id, "quantity": 0, "unit_price": "2.50" }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_an_order_removes_it() {
    let app = TestApp::new().await;
    let fx = fixture(&app).await;
    let id = id_of(&app.create_order(json!({ "company_id": fx.company_id })).await);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/orders/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .request(Method::GET, &format!("/api/orders/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_filters_by_status() {
    let app = TestApp::new().await;
    let fx = fixture(&app).await;
    let first = id_of(&app.create_order(json!({ "company_id": fx.company_id })).await);
    app.create_order(json!({ "company_id": fx.company_id })).await;
    app.request(
        Method::PUT,
        &format!("/api/orders/{first}/status"),
        Some(json!({ "status": "in_production" })),
    )
    .await;

    let (status, body) = app
        .request(Method::GET, "/api/orders?status=in_production", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["id"], json!(first));

    let (status, _) = app
        .request(Method::GET, "/api/orders?status=bogus", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_records_hang_off_the_order() {
    let app = TestApp::new().await;
    let fx = fixture(&app).await;
    let id = id_of(&app.create_order(json!({ "company_id": fx.company_id })).await);

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/orders/{id}/artwork"),
            Some(json!({
                "file_name": "logo.ai",
                "original_name": "Lakeside Logo.ai",
                "file_path": "/uploads/logo.ai",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, files) = app
        .request(
            Method::GET,
            &format!("/api/companies/{}/artwork", fx.company_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(files["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_user_header_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(Method::GET, "/api/orders", None, Some("not-a-uuid"))
        .await;
    // Handlers that never read the acting user ignore the header.
    assert_eq!(status, StatusCode::OK);

    let fx = fixture(&app).await;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/orders",
            Some(json!({ "company_id": fx.company_id })),
            Some("not-a-uuid"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn amounts_beyond_a_money_column_are_rejected() {
    let app = TestApp::new().await;
    let fx = fixture(&app).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({
                "company_id": fx.company_id,
                "items": [{
                    "product_id": fx.product_id,
                    "quantity": 2_000_000_000,
                    "unit_price": "79228162514264337593543950",
                }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({
                "company_id": fx.company_id,
                "items": [{ "product_id": fx.product_id, "quantity": 2, "unit_price": "6000000000" }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({ "company_id": fx.company_id, "shipping": "10000000000" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Each line fits, but their sum would not.
    let order = app
        .create_order(json!({
            "company_id": fx.company_id,
            "tax": "0",
            "items": [{ "product_id": fx.product_id, "quantity": 1, "unit_price": "6000000000" }],
        }))
        .await;
    let id = id_of(&order);
    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/orders/{id}/items"),
            Some(json!({ "product_id": fx.product_id, "quantity": 1, "unit_price": "6000000000" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = app
        .request(Method::GET, &format!("/api/orders/{id}"), None)
        .await;
    assert_eq!(fetched["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(money(&fetched["data"]["total"]), 6_000_000_000.0);
}

#[tokio::test]
async fn blank_order_numbers_are_rejected() {
    let app = TestApp::new().await;
    let company = app.create_company("Summit Rowing Club").await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({ "company_id": company, "order_number": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}
