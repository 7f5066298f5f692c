//! End-to-end endpoint tests over an in-memory database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use habits_api::api::{create_router, AppState};
use habits_core::open_db_in_memory;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    let conn = open_db_in_memory().expect("in-memory db should open");
    create_router(AppState::new(conn))
}

async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should not fail at transport level");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, body)
}

async fn create_habit(app: &Router, title: &str) -> i64 {
    let (status, body) =
        request(app, Method::POST, "/habits/", Some(json!({"title": title}))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("created habit should carry id")
}

#[tokio::test]
async fn habit_crud_lifecycle() {
    let app = test_app();

    let (status, created) = request(
        &app,
        Method::POST,
        "/habits/",
        Some(json!({"title": "Read", "content": "before bed"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["title"], "Read");
    assert_eq!(created["content"], "before bed");
    assert_eq!(created["is_active"], true);
    assert!(created["created_at"].is_string());

    let (status, listed) = request(&app, Method::GET, "/habits/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, fetched) = request(&app, Method::GET, "/habits/1/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Read");

    let (status, updated) = request(
        &app,
        Method::PUT,
        "/habits/1/",
        Some(json!({"title": "Read more"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Read more");
    assert_eq!(updated["content"], "before bed");
    assert_eq!(updated["created_at"], created["created_at"]);

    let (status, patched) = request(
        &app,
        Method::PATCH,
        "/habits/1/",
        Some(json!({"content": "anywhere"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["title"], "Read more");
    assert_eq!(patched["content"], "anywhere");

    let (status, body) = request(&app, Method::DELETE, "/habits/1/", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = request(&app, Method::GET, "/habits/1/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not found."}));
}

#[tokio::test]
async fn habit_create_validation_errors() {
    let app = test_app();

    let (status, body) = request(&app, Method::POST, "/habits/", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"title": ["This field is required."]}));

    let (status, body) = request(
        &app,
        Method::POST,
        "/habits/",
        Some(json!({"title": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"title": ["This field may not be blank."]}));

    let (status, body) = request(&app, Method::POST, "/habits/", Some(json!(["Read"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"non_field_errors": ["Invalid data. Expected a dictionary."]})
    );
}

#[tokio::test]
async fn deactivated_habit_disappears_from_api() {
    let app = test_app();
    let id = create_habit(&app, "Stretch").await;

    let (status, patched) = request(
        &app,
        Method::PATCH,
        &format!("/habits/{id}/"),
        Some(json!({"is_active": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["is_active"], false);

    let (status, _) = request(&app, Method::GET, &format!("/habits/{id}/"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        Method::PUT,
        &format!("/habits/{id}/"),
        Some(json!({"title": "Stretch"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(&app, Method::DELETE, &format!("/habits/{id}/"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listed) = request(&app, Method::GET, "/habits/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn log_lifecycle_with_protected_habit() {
    let app = test_app();
    let habit_id = create_habit(&app, "Read").await;

    let (status, created) = request(
        &app,
        Method::POST,
        "/habit-logs/",
        Some(json!({"habit": habit_id, "date": "2025-06-01", "done": true})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["habit"], habit_id);
    assert_eq!(created["habit_title"], "Read");
    assert_eq!(created["date"], "2025-06-01");
    assert_eq!(created["done"], true);
    let log_id = created["id"].as_i64().expect("log should carry id");

    // Same (habit, date) pair again, even with a different done flag.
    let (status, body) = request(
        &app,
        Method::POST,
        "/habit-logs/",
        Some(json!({"habit": habit_id, "date": "2025-06-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"non_field_errors": ["The fields habit, date must make a unique set."]})
    );

    // The habit is protected while the log references it.
    let (status, body) = request(&app, Method::DELETE, &format!("/habits/{habit_id}/"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"]
        .as_str()
        .is_some_and(|detail| detail.contains("completion logs")));

    let (status, _) = request(&app, Method::DELETE, &format!("/habit-logs/{log_id}/"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(&app, Method::DELETE, &format!("/habits/{habit_id}/"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn log_create_validation_errors() {
    let app = test_app();

    let (status, body) = request(
        &app,
        Method::POST,
        "/habit-logs/",
        Some(json!({"habit": 42, "date": "2025-06-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"habit": ["Invalid pk \"42\" - object does not exist."]})
    );

    let (status, body) = request(
        &app,
        Method::POST,
        "/habit-logs/",
        Some(json!({"habit": 1, "date": "06/01/2025"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"date": ["Date has wrong format. Use one of these formats instead: YYYY-MM-DD."]})
    );

    let (status, body) = request(&app, Method::POST, "/habit-logs/", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "date": ["This field is required."],
            "habit": ["This field is required."]
        })
    );
}

#[tokio::test]
async fn logs_list_newest_date_first() {
    let app = test_app();
    let reading = create_habit(&app, "Read").await;
    let running = create_habit(&app, "Run").await;

    for (habit, date) in [
        (reading, "2025-06-01"),
        (running, "2025-06-03"),
        (reading, "2025-06-02"),
    ] {
        let (status, _) = request(
            &app,
            Method::POST,
            "/habit-logs/",
            Some(json!({"habit": habit, "date": date})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, listed) = request(&app, Method::GET, "/habit-logs/", None).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = listed
        .as_array()
        .expect("list body should be an array")
        .iter()
        .map(|entry| entry["date"].as_str().expect("date should be a string"))
        .collect();
    assert_eq!(dates, vec!["2025-06-03", "2025-06-02", "2025-06-01"]);
}

#[tokio::test]
async fn log_update_and_partial_update() {
    let app = test_app();
    let reading = create_habit(&app, "Read").await;
    let running = create_habit(&app, "Run").await;

    let (status, created) = request(
        &app,
        Method::POST,
        "/habit-logs/",
        Some(json!({"habit": reading, "date": "2025-06-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let log_id = created["id"].as_i64().expect("log should carry id");

    // Full update reassigns the owning habit; the joined title follows.
    let (status, updated) = request(
        &app,
        Method::PUT,
        &format!("/habit-logs/{log_id}/"),
        Some(json!({"habit": running, "date": "2025-06-02"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["habit"], running);
    assert_eq!(updated["habit_title"], "Run");
    assert_eq!(updated["date"], "2025-06-02");

    let (status, patched) = request(
        &app,
        Method::PATCH,
        &format!("/habit-logs/{log_id}/"),
        Some(json!({"done": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["habit"], running);
    assert_eq!(patched["date"], "2025-06-02");
    assert_eq!(patched["done"], true);

    // Moving onto an occupied (habit, date) pair is rejected.
    let (status, _) = request(
        &app,
        Method::POST,
        "/habit-logs/",
        Some(json!({"habit": running, "date": "2025-06-03"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = request(
        &app,
        Method::PATCH,
        &format!("/habit-logs/{log_id}/"),
        Some(json!({"date": "2025-06-03"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"non_field_errors": ["The fields habit, date must make a unique set."]})
    );
}

#[tokio::test]
async fn missing_log_answers_not_found() {
    let app = test_app();

    let (status, body) = request(&app, Method::GET, "/habit-logs/99/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not found."}));

    let (status, _) = request(&app, Method::DELETE, "/habit-logs/99/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        Method::PUT,
        "/habit-logs/99/",
        Some(json!({"habit": 1, "date": "2025-06-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
