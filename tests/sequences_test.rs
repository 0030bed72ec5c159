mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, TestApp};
use serde_json::json;
use uuid::Uuid;

async fn draft_sequence(app: &TestApp) -> Uuid {
    let (status, body) = app
        .request(
            Method::POST,
            "/api/sequences",
            Some(json!({
                "name": "Post-show follow up",
                "steps": [
                    { "step_type": "email", "subject": "Great meeting you", "content": "Hi {{first_name}}" },
                    { "step_type": "task", "delay_days": 2 },
                    { "step_type": "call", "delay_hours": 3 },
                ],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create sequence: {body}");
    assert_eq!(body["data"]["status"], "draft");
    assert_eq!(body["data"]["steps"].as_array().unwrap().len(), 3);
    id_of(&body)
}

async fn activate(app: &TestApp, sequence: Uuid) {
    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/sequences/{sequence}"),
            Some(json!({ "status": "active" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "active");
}

async fn enroll(app: &TestApp, sequence: Uuid, contact: Uuid) -> (StatusCode, serde_json::Value) {
    app.request(
        Method::POST,
        &format!("/api/sequences/{sequence}/enrollments"),
        Some(json!({ "contact_id": contact })),
    )
    .await
}

#[tokio::test]
async fn only_active_sequences_accept_enrollments() {
    let app = TestApp::new().await;
    let company = app.create_company("Harbor Dental").await;
    let contact = app.create_contact(company, "Quinn").await;
    let sequence = draft_sequence(&app).await;

    let (status, _) = enroll(&app, sequence, contact).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    activate(&app, sequence).await;
    let (status, enrollment) = enroll(&app, sequence, contact).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(enrollment["data"]["status"], "active");
    assert_eq!(enrollment["data"]["current_step"], 0);

    let (status, _) = enroll(&app, sequence, contact).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = enroll(&app, sequence, Uuid::new_v4()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_step_types_are_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/sequences",
            Some(json!({
                "name": "Broken",
                "steps": [{ "step_type": "carrier_pigeon" }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn enrollments_advance_to_completion() {
    let app = TestApp::new().await;
    let company = app.create_company("Cedar Park Library").await;
    let contact = app.create_contact(company, "Rowan").await;
    let sequence = draft_sequence(&app).await;
    activate(&app, sequence).await;

    let (_, enrollment) = enroll(&app, sequence, contact).await;
    let enrollment_id = id_of(&enrollment);

    // The first step has no delay, so it is due right away.
    let (status, due) = app
        .request(Method::GET, "/api/sequence-enrollments/due", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(due["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["id"] == json!(enrollment_id)));

    let advance = format!("/api/sequence-enrollments/{enrollment_id}/advance");
    let (status, step_one) = app.request(Method::POST, &advance, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(step_one["data"]["current_step"], 1);
    assert_eq!(step_one["data"]["status"], "active");

    // Step two waits two days.
    let (_, due) = app
        .request(Method::GET, "/api/sequence-enrollments/due", None)
        .await;
    assert!(due["data"].as_array().unwrap().is_empty());

    app.request(Method::POST, &advance, None).await;
    let (status, done) = app.request(Method::POST, &advance, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["data"]["status"], "completed");
    assert_eq!(done["data"]["current_step"], 3);
    assert!(done["data"]["next_step_at"].is_null());

    let (status, _) = app.request(Method::POST, &advance, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/sequence-enrollments/{enrollment_id}/stop"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, analytics) = app
        .request(Method::GET, &format!("/api/sequences/{sequence}/analytics"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &analytics["data"];
    assert_eq!(data["step_count"], 3);
    assert_eq!(data["total_duration_minutes"], 2 * 24 * 60 + 3 * 60);
    assert_eq!(data["enrollments"]["completed"], 1);
    assert_eq!(data["enrollments"]["total"], 1);
}

#[tokio::test]
async fn stopping_is_idempotent() {
    let app = TestApp::new().await;
    let company = app.create_company("Granite Gym").await;
    let contact = app.create_contact(company, "Sage").await;
    let sequence = draft_sequence(&app).await;
    activate(&app, sequence).await;
    let (_, enrollment) = enroll(&app, sequence, contact).await;
    let stop = format!("/api/sequence-enrollments/{}/stop", id_of(&enrollment));

    for _ in 0..2 {
        let (status, body) = app.request(Method::POST, &stop, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "stopped");
    }

    // A stopped enrollment no longer blocks a new one.
    let (status, _) = enroll(&app, sequence, contact).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, listed) = app
        .request(Method::GET, &format!("/api/sequences/{sequence}/enrollments"), None)
        .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 2);
}
