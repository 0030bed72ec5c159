mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

async fn mockup_with_logo(app: &TestApp) -> (Uuid, Uuid, Value) {
    let (status, created) = app
        .request(
            Method::POST,
            "/api/mockups",
            Some(json!({
                "name": "Tote front",
                "product_image_url": "https://cdn.swagsuite.test/tote.png",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let mockup = id_of(&created);
    assert_eq!(created["data"]["logos"], json!([]));

    let (status, with_logo) = app
        .request(
            Method::POST,
            &format!("/api/mockups/{mockup}/logos"),
            Some(json!({
                "image_url": "https://cdn.swagsuite.test/logo.png",
                "name": "Primary mark",
                "x": 120.0,
                "y": 80.0,
                "width": 0.25,
                "rotation": -90.0,
                "opacity": 1.5,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "add logo: {with_logo}");
    let logo = with_logo["data"]["logos"][0].clone();
    let logo_id = Uuid::parse_str(logo["id"].as_str().unwrap()).unwrap();
    (mockup, logo_id, logo)
}

#[tokio::test]
async fn logo_placement_is_normalized() {
    let app = TestApp::new().await;
    let (_, _, logo) = mockup_with_logo(&app).await;

    assert_eq!(logo["x"], 120.0);
    assert_eq!(logo["y"], 80.0);
    assert_eq!(logo["width"], 1.0);
    assert_eq!(logo["rotation"], 270.0);
    assert_eq!(logo["opacity"], 1.0);
    assert_eq!(logo["background_removed"], false);
}

#[tokio::test]
async fn logo_edits_persist() {
    let app = TestApp::new().await;
    let (mockup, logo, _) = mockup_with_logo(&app).await;

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/mockups/{mockup}/logos/{logo}"),
            Some(json!({ "rotation": 450.0, "opacity": 0.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/mockups/{mockup}/logos/{logo}/remove-background"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/mockups/{mockup}/logos/{logo}/color"),
            Some(json!({ "color": "#FF6600" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = app
        .request(Method::GET, &format!("/api/mockups/{mockup}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let stored = &fetched["data"]["logos"][0];
    assert_eq!(stored["rotation"], 90.0);
    assert_eq!(stored["opacity"], 0.5);
    assert_eq!(stored["background_removed"], true);
    assert_eq!(stored["applied_color"], "#ff6600");
}

#[tokio::test]
async fn invalid_color_leaves_the_logo_untouched() {
    let app = TestApp::new().await;
    let (mockup, logo, _) = mockup_with_logo(&app).await;

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/mockups/{mockup}/logos/{logo}/color"),
            Some(json!({ "color": "orange" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = app
        .request(Method::GET, &format!("/api/mockups/{mockup}"), None)
        .await;
    assert_eq!(fetched["data"]["logos"][0]["applied_color"], Value::Null);
}

#[tokio::test]
async fn removing_a_logo_twice_is_not_found() {
    let app = TestApp::new().await;
    let (mockup, logo, _) = mockup_with_logo(&app).await;

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/mockups/{mockup}/logos/{logo}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["logos"], json!([]));

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/mockups/{mockup}/logos/{logo}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_mockup_is_not_found() {
    let app = TestApp::new().await;
    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/mockups/{}/logos", Uuid::new_v4()),
            Some(json!({ "image_url": "https://cdn.swagsuite.test/logo.png" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
