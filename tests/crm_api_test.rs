mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, money, TestApp};
use serde_json::json;

#[tokio::test]
async fn company_crud_round_trip() {
    let app = TestApp::new().await;

    let (status, created) = app
        .request(
            Method::POST,
            "/api/companies",
            Some(json!({
                "name": "Riverside Brewing",
                "email": "orders@riverside.test",
                "industry": "Hospitality",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = id_of(&created);
    assert_eq!(money(&created["data"]["ytd_spend"]), 0.0);

    let (status, updated) = app
        .request(
            Method::PUT,
            &format!("/api/companies/{id}"),
            Some(json!({ "city": "Portland" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["city"], "Portland");
    assert_eq!(updated["data"]["name"], "Riverside Brewing");

    let (status, listed) = app
        .request(Method::GET, "/api/companies?search=river", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"]["total"], 1);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/companies/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .request(Method::GET, &format!("/api/companies/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_company_email_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/companies",
            Some(json!({ "name": "Bad Mail Co", "email": "not-an-email" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn company_contacts_are_listed_under_the_company() {
    let app = TestApp::new().await;
    let company = app.create_company("Summit Credit Union").await;
    let other = app.create_company("Elsewhere Inc").await;
    app.create_contact(company, "Avery").await;
    app.create_contact(company, "Blake").await;
    app.create_contact(other, "Casey").await;

    let (status, body) = app
        .request(Method::GET, &format!("/api/companies/{company}/contacts"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/companies/{}/contacts", uuid::Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn company_with_orders_cannot_be_deleted() {
    let app = TestApp::new().await;
    let company = app.create_company("Keep Me LLC").await;
    app.create_order(json!({ "company_id": company })).await;

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/companies/{company}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .request(Method::GET, &format!("/api/companies/{company}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn ytd_spend_follows_the_company_orders() {
    let app = TestApp::new().await;
    let company = app.create_company("Big Spender Co").await;
    app.create_order(json!({ "company_id": company, "tax": "0", "shipping": "40.50" }))
        .await;
    let cancelled = id_of(
        &app.create_order(json!({ "company_id": company, "tax": "0", "shipping": "100" }))
            .await,
    );
    app.request(
        Method::PUT,
        &format!("/api/orders/{cancelled}/status"),
        Some(json!({ "status": "cancelled" })),
    )
    .await;

    let (_, body) = app
        .request(Method::GET, &format!("/api/companies/{company}"), None)
        .await;
    assert_eq!(money(&body["data"]["ytd_spend"]), 40.5);
}

#[tokio::test]
async fn converting_a_lead_creates_company_and_contact_once() {
    let app = TestApp::new().await;

    let (status, lead) = app
        .request(
            Method::POST,
            "/api/leads",
            Some(json!({
                "first_name": "Morgan",
                "last_name": "Reyes",
                "email": "morgan@northfield.test",
                "company_name": "Northfield Robotics",
                "source": "trade show",
                "estimated_value": "5000",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(lead["data"]["status"], "new");
    let lead_id = id_of(&lead);

    let (status, converted) = app
        .request(
            Method::POST,
            &format!("/api/leads/{lead_id}/convert"),
            Some(json!({ "title": "Operations Manager" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let data = &converted["data"];
    assert_eq!(data["lead"]["status"], "converted");
    assert_eq!(data["company"]["name"], "Northfield Robotics");
    assert_eq!(data["contact"]["is_primary"], true);
    assert_eq!(data["contact"]["company_id"], data["company"]["id"]);
    assert_eq!(data["lead"]["converted_company_id"], data["company"]["id"]);

    let (status, _) = app
        .request(Method::POST, &format!("/api/leads/{lead_id}/convert"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn lead_status_filter_rejects_unknown_values() {
    let app = TestApp::new().await;
    let (status, _) = app
        .request(Method::GET, "/api/leads?status=lukewarm", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.request(Method::GET, "/api/leads?status=new", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn supplier_with_products_cannot_be_deleted() {
    let app = TestApp::new().await;
    let supplier = app.create_supplier("SanMar").await;
    let product = app.create_product(supplier, "Core Polo", "8.75").await;

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/suppliers/{supplier}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/products/{product}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .request(Method::DELETE, &format!("/api/suppliers/{supplier}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn product_search_matches_name() {
    let app = TestApp::new().await;
    let supplier = app.create_supplier("Port Authority").await;
    app.create_product(supplier, "Fleece Jacket", "22.00").await;
    app.create_product(supplier, "Canvas Tote", "3.25").await;

    let (status, body) = app
        .request(Method::GET, "/api/products?q=tote", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "Canvas Tote");
    assert_eq!(body["data"]["items"][0]["colors"], json!(["Navy", "White"]));
}

#[tokio::test]
async fn users_are_listed() {
    let app = TestApp::new().await;
    let id = app.create_user("casey").await;

    let (status, body) = app.request(Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|u| u["id"] == json!(id)));
}

async fn primary_contact(app: &TestApp, company: uuid::Uuid, first_name: &str) -> uuid::Uuid {
    let (status, body) = app
        .request(
            Method::POST,
            "/api/contacts",
            Some(json!({
                "company_id": company,
                "first_name": first_name,
                "last_name": "Lead",
                "is_primary": true,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create contact: {body}");
    assert_eq!(body["data"]["is_primary"], true);
    id_of(&body)
}

async fn primaries_of(app: &TestApp, company: uuid::Uuid) -> Vec<serde_json::Value> {
    let (status, body) = app
        .request(Method::GET, &format!("/api/companies/{company}/contacts"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["is_primary"] == true)
        .map(|c| c["id"].clone())
        .collect()
}

#[tokio::test]
async fn a_new_primary_contact_replaces_the_old_one() {
    let app = TestApp::new().await;
    let company = app.create_company("Lighthouse Realty").await;
    let first = primary_contact(&app, company, "Morgan").await;
    let second = primary_contact(&app, company, "Jordan").await;

    assert_eq!(primaries_of(&app, company).await, vec![json!(second)]);
    let (_, body) = app
        .request(Method::GET, &format!("/api/contacts/{first}"), None)
        .await;
    assert_eq!(body["data"]["is_primary"], false);
}

#[tokio::test]
async fn moving_a_primary_contact_keeps_one_primary_per_company() {
    let app = TestApp::new().await;
    let a = app.create_company("Alder Outfitters").await;
    let b = app.create_company("Birch Catering").await;
    let ann = primary_contact(&app, a, "Ann").await;
    let bob = primary_contact(&app, b, "Bob").await;

    let (status, moved) = app
        .request(
            Method::PUT,
            &format!("/api/contacts/{ann}"),
            Some(json!({ "company_id": b })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["data"]["is_primary"], false);
    assert_eq!(primaries_of(&app, b).await, vec![json!(bob)]);
    assert!(primaries_of(&app, a).await.is_empty());

    // Asking to stay primary while moving takes over from Bob.
    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/contacts/{ann}"),
            Some(json!({ "company_id": a, "is_primary": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/contacts/{ann}"),
            Some(json!({ "company_id": b, "is_primary": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(primaries_of(&app, b).await, vec![json!(ann)]);
}

#[tokio::test]
async fn contacts_link_to_a_company_or_a_supplier_not_both() {
    let app = TestApp::new().await;
    let company = app.create_company("Cobalt Fitness").await;
    let supplier = app.create_supplier("SanMar").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/contacts",
            Some(json!({
                "company_id": company,
                "supplier_id": supplier,
                "first_name": "Drew",
                "last_name": "Both",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let contact = app.create_contact(company, "Ellis").await;
    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/contacts/{contact}"),
            Some(json!({ "company_id": company, "supplier_id": supplier })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_company_detaches_its_contacts() {
    let app = TestApp::new().await;
    let company = app.create_company("Dune Surf Shop").await;
    let primary = primary_contact(&app, company, "Frankie").await;
    let other = app.create_contact(company, "Gray").await;

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/companies/{company}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for id in [primary, other] {
        let (status, body) = app
            .request(Method::GET, &format!("/api/contacts/{id}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["company_id"].is_null());
        assert_eq!(body["data"]["is_primary"], false);
    }
}
