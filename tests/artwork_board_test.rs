mod common;

use axum::http::{Method, StatusCode};
use common::{id_of, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

async fn board(app: &TestApp) -> Vec<Value> {
    let (status, body) = app.request(Method::GET, "/api/artwork/board", None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["columns"].as_array().cloned().unwrap()
}

fn column_id(column: &Value) -> Uuid {
    Uuid::parse_str(column["id"].as_str().unwrap()).unwrap()
}

async fn create_card(app: &TestApp, column: Uuid, title: &str, assignee: Option<Uuid>) -> Uuid {
    let (status, body) = app
        .request(
            Method::POST,
            "/api/artwork/cards",
            Some(json!({
                "column_id": column,
                "title": title,
                "priority": "high",
                "labels": ["rush"],
                "assigned_user_id": assignee,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create card: {body}");
    id_of(&body)
}

fn card_titles(column: &Value) -> Vec<String> {
    column["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap().to_string())
        .collect()
}

fn card_positions(column: &Value) -> Vec<i64> {
    column["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["position"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn first_visit_seeds_the_default_columns() {
    let app = TestApp::new().await;
    let columns = board(&app).await;
    let names: Vec<&str> = columns.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["Artwork Needed", "In Progress", "Proof Sent", "Changes Requested", "Approved"]
    );
    assert!(columns.iter().all(|c| c["is_default"] == true));

    // Opening the board again does not seed twice.
    assert_eq!(board(&app).await.len(), 5);
}

#[tokio::test]
async fn concurrent_first_visits_seed_once() {
    let app = TestApp::new().await;
    let (a, b, c) = tokio::join!(board(&app), board(&app), board(&app));
    assert_eq!(a.len(), 5);
    assert_eq!(b.len(), 5);
    assert_eq!(c.len(), 5);
    assert_eq!(board(&app).await.len(), 5);
}

#[tokio::test]
async fn cards_move_between_columns_with_contiguous_positions() {
    let app = TestApp::new().await;
    let columns = board(&app).await;
    let needed = column_id(&columns[0]);
    let in_progress = column_id(&columns[1]);

    let a = create_card(&app, needed, "Team shirts", None).await;
    create_card(&app, needed, "Event banner", None).await;
    create_card(&app, needed, "Mug proof", None).await;
    create_card(&app, in_progress, "Hat embroidery", None).await;

    let (status, moved) = app
        .request(
            Method::PUT,
            &format!("/api/artwork/cards/{a}/move"),
            Some(json!({ "column_id": in_progress, "position": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["data"]["column_id"], json!(in_progress));
    assert_eq!(moved["data"]["position"], 1);
    assert_eq!(moved["data"]["labels"], json!(["rush"]));

    let columns = board(&app).await;
    assert_eq!(card_titles(&columns[0]), vec!["Event banner", "Mug proof"]);
    assert_eq!(card_positions(&columns[0]), vec![0, 1]);
    assert_eq!(card_titles(&columns[1]), vec!["Hat embroidery", "Team shirts"]);
    assert_eq!(card_positions(&columns[1]), vec![0, 1]);
}

#[tokio::test]
async fn moving_past_the_end_appends() {
    let app = TestApp::new().await;
    let columns = board(&app).await;
    let needed = column_id(&columns[0]);
    let first = create_card(&app, needed, "First", None).await;
    create_card(&app, needed, "Second", None).await;

    let (status, moved) = app
        .request(
            Method::PUT,
            &format!("/api/artwork/cards/{first}/move"),
            Some(json!({ "column_id": needed, "position": 99 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["data"]["position"], 1);

    let columns = board(&app).await;
    assert_eq!(card_titles(&columns[0]), vec!["Second", "First"]);
}

#[tokio::test]
async fn column_with_cards_cannot_be_deleted() {
    let app = TestApp::new().await;
    let columns = board(&app).await;
    let needed = column_id(&columns[0]);
    let card = create_card(&app, needed, "Blocking card", None).await;

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/artwork/columns/{needed}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/artwork/cards/{card}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .request(Method::DELETE, &format!("/api/artwork/columns/{needed}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let columns = board(&app).await;
    let positions: Vec<i64> = columns
        .iter()
        .map(|c| c["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn columns_can_be_added_and_reordered() {
    let app = TestApp::new().await;
    let columns = board(&app).await;

    let (status, created) = app
        .request(
            Method::POST,
            "/api/artwork/columns",
            Some(json!({ "name": "On Hold", "color": "#A1B2C3" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["position"], 5);
    assert_eq!(created["data"]["color"], "#a1b2c3");
    let on_hold = id_of(&created);

    let (status, reordered) = app
        .request(
            Method::PUT,
            "/api/artwork/columns/reorder",
            Some(json!({ "ids": [on_hold, column_id(&columns[0])] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = reordered["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names[0], "On Hold");
    assert_eq!(names[1], "Artwork Needed");
    assert_eq!(names[2], "In Progress");
    assert_eq!(names.len(), 6);
}

#[tokio::test]
async fn bad_reorders_and_colors_are_rejected() {
    let app = TestApp::new().await;
    let columns = board(&app).await;
    let first = column_id(&columns[0]);

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/artwork/columns/reorder",
            Some(json!({ "ids": [first, first] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/artwork/columns/reorder",
            Some(json!({ "ids": [Uuid::new_v4()] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/artwork/columns",
            Some(json!({ "name": "Neon", "color": "green" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn moving_an_assigned_card_notifies_the_assignee() {
    let app = TestApp::new().await;
    let designer = app.create_user("riley").await;
    let columns = board(&app).await;
    let card = create_card(&app, column_id(&columns[0]), "Jersey numbers", Some(designer)).await;

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/artwork/cards/{card}/move"),
            Some(json!({ "column_id": column_id(&columns[2]), "position": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let notifications = app.wait_for_notifications(designer, 1).await;
    assert_eq!(notifications[0]["entity_type"], "artwork_card");
    assert!(notifications[0]["message"]
        .as_str()
        .unwrap()
        .contains("Proof Sent"));
}
