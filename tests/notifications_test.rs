mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, TestApp};
use serde_json::json;

#[tokio::test]
async fn assigned_order_status_change_notifies_the_assignee() {
    let app = TestApp::new().await;
    let rep = app.create_user("dakota").await;
    let company = app.create_company("Westbrook Marathon").await;
    let order = id_of(
        &app.create_order(json!({ "company_id": company, "assigned_user_id": rep }))
            .await,
    );

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/orders/{order}/status"),
            Some(json!({ "status": "cancelled" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let notifications = app.wait_for_notifications(rep, 1).await;
    let first = &notifications[0];
    assert_eq!(first["entity_type"], "order");
    assert_eq!(first["entity_id"], json!(order));
    assert_eq!(first["kind"], "warning");
    assert_eq!(first["is_read"], false);
    assert!(first["title"].as_str().unwrap().starts_with("Order ORD-"));
}

#[tokio::test]
async fn read_state_is_tracked_per_user() {
    let app = TestApp::new().await;
    let rep = app.create_user("emerson").await;
    let other = app.create_user("finley").await;
    let company = app.create_company("Oak Valley Farms").await;
    for _ in 0..2 {
        let order = id_of(
            &app.create_order(json!({ "company_id": company, "assigned_user_id": rep }))
                .await,
        );
        app.request(
            Method::PUT,
            &format!("/api/orders/{order}/status"),
            Some(json!({ "status": "approved" })),
        )
        .await;
    }
    let notifications = app.wait_for_notifications(rep, 2).await;

    let (_, count) = app
        .request_as(rep, Method::GET, "/api/notifications/unread-count", None)
        .await;
    assert_eq!(count["data"]["unread"], 2);
    let (_, count) = app
        .request_as(other, Method::GET, "/api/notifications/unread-count", None)
        .await;
    assert_eq!(count["data"]["unread"], 0);

    let first = notifications[0]["id"].as_str().unwrap();
    let (status, marked) = app
        .request(Method::PUT, &format!("/api/notifications/{first}/read"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["data"]["is_read"], true);

    let (_, unread) = app
        .request_as(rep, Method::GET, "/api/notifications?unread_only=true", None)
        .await;
    assert_eq!(unread["data"].as_array().unwrap().len(), 1);

    let (status, all) = app
        .request_as(rep, Method::PUT, "/api/notifications/read-all", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["data"]["updated"], 1);

    let (_, count) = app
        .request_as(rep, Method::GET, "/api/notifications/unread-count", None)
        .await;
    assert_eq!(count["data"]["unread"], 0);
}

#[tokio::test]
async fn notifications_require_an_acting_user() {
    let app = TestApp::new().await;
    let (status, _) = app.request(Method::GET, "/api/notifications", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unassigned_orders_notify_nobody() {
    let app = TestApp::new().await;
    let rep = app.create_user("harper").await;
    let company = app.create_company("Pine Ridge Camp").await;
    let order = id_of(&app.create_order(json!({ "company_id": company })).await);
    app.request(
        Method::PUT,
        &format!("/api/orders/{order}/status"),
        Some(json!({ "status": "approved" })),
    )
    .await;

    let (_, activities) = app
        .request(Method::GET, "/api/activities?limit=5", None)
        .await;
    assert!(!activities["data"].as_array().unwrap().is_empty());

    let (_, count) = app
        .request_as(rep, Method::GET, "/api/notifications/unread-count", None)
        .await;
    assert_eq!(count["data"]["unread"], 0);
}
