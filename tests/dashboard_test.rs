mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, money, TestApp};
use serde_json::json;

async fn order_with_status(
    app: &TestApp,
    company: uuid::Uuid,
    shipping: &str,
    status: Option<&str>,
    assignee: Option<uuid::Uuid>,
) {
    let id = id_of(
        &app.create_order(json!({
            "company_id": company,
            "tax": "0",
            "shipping": shipping,
            "assigned_user_id": assignee,
        }))
        .await,
    );
    if let Some(status) = status {
        let (code, _) = app
            .request(
                Method::PUT,
                &format!("/api/orders/{id}/status"),
                Some(json!({ "status": status })),
            )
            .await;
        assert_eq!(code, StatusCode::OK);
    }
}

#[tokio::test]
async fn stats_leave_cancelled_orders_out_of_revenue() {
    let app = TestApp::new().await;
    let company = app.create_company("Metro Transit").await;
    order_with_status(&app, company, "100", None, None).await;
    order_with_status(&app, company, "50.50", Some("approved"), None).await;
    order_with_status(&app, company, "1000", Some("cancelled"), None).await;

    let (status, body) = app.request(Method::GET, "/api/dashboard/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"];
    assert_eq!(stats["total_orders"], 2);
    assert_eq!(money(&stats["total_revenue"]), 150.5);
    assert_eq!(money(&stats["ytd_revenue"]), 150.5);
    assert_eq!(money(&stats["average_order_value"]), 75.25);
    assert_eq!(stats["open_quotes"], 1);
    assert_eq!(stats["active_orders"], 1);
    assert_eq!(stats["orders_by_status"]["cancelled"], 1);
    assert_eq!(stats["orders_by_status"]["quote"], 1);
}

#[tokio::test]
async fn empty_dashboard_is_all_zeroes() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/dashboard/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_orders"], 0);
    assert_eq!(money(&body["data"]["average_order_value"]), 0.0);

    let (status, team) = app
        .request(Method::GET, "/api/dashboard/team-performance", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["data"], json!([]));
}

#[tokio::test]
async fn team_performance_ranks_by_revenue() {
    let app = TestApp::new().await;
    let company = app.create_company("Brightline Events").await;
    let alex = app.create_user("alex").await;
    let blair = app.create_user("blair").await;
    order_with_status(&app, company, "40", None, Some(alex)).await;
    order_with_status(&app, company, "200", Some("approved"), Some(blair)).await;
    order_with_status(&app, company, "500", Some("cancelled"), Some(alex)).await;
    order_with_status(&app, company, "75", None, None).await;

    let (status, body) = app
        .request(Method::GET, "/api/dashboard/team-performance", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let team = body["data"].as_array().unwrap();
    assert_eq!(team.len(), 2);
    assert_eq!(team[0]["user_id"], json!(blair));
    assert_eq!(team[0]["name"], "Test blair");
    assert_eq!(money(&team[0]["revenue"]), 200.0);
    assert_eq!(team[1]["user_id"], json!(alex));
    assert_eq!(team[1]["order_count"], 1);
    assert_eq!(money(&team[1]["revenue"]), 40.0);
}

#[tokio::test]
async fn recent_orders_are_capped() {
    let app = TestApp::new().await;
    let company = app.create_company("Quarry Coffee").await;
    for _ in 0..3 {
        order_with_status(&app, company, "1", None, None).await;
    }
    let (status, body) = app
        .request(Method::GET, "/api/dashboard/recent-orders?limit=2", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn integration_status_never_leaks_values() {
    let app = TestApp::new().await;
    let (status, body) = app
        .request(Method::GET, "/api/integrations/status", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let integrations = body["data"]["integrations"].as_array().unwrap();
    let names: Vec<&str> = integrations
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["slack", "hubspot", "quickbooks", "ssactivewear"]);
    assert!(integrations.iter().all(|i| i["configured"] == false));
}

#[tokio::test]
async fn health_and_status_respond() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.is_null());

    let (status, _) = app.request(Method::GET, "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
}
