use std::sync::Arc;

use assignmenthub::api::router;
use assignmenthub::clock::FixedClock;
use assignmenthub::config::AppConfig;
use assignmenthub::db;
use assignmenthub::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

async fn setup() -> (Router, Arc<FixedClock>) {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create database");

    let clock = Arc::new(FixedClock::new(now()));
    let state = AppState {
        db: pool,
        clock: clock.clone(),
        config: Arc::new(AppConfig::default()),
    };

    (router(state), clock)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_class(app: &Router, passcode: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/classes",
        Some(json!({
            "name": "Algebra I",
            "subject": "Mathematics",
            "passcode": passcode,
            "teacherName": "Ms. Rivera"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn create_assignment(
    app: &Router,
    class_id: &str,
    title: &str,
    available_from: DateTime<Utc>,
    deadline: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/assignments",
        Some(json!({
            "classId": class_id,
            "title": title,
            "subject": "Mathematics",
            "description": "Exercises 1-10",
            "teacherNotes": "answer key in drawer",
            "file": { "filename": "f81d4fae.pdf", "originalName": "worksheet.pdf" },
            "availableFrom": available_from.to_rfc3339(),
            "deadline": deadline.to_rfc3339(),
            "expiresAt": expires_at.to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_health() {
    let (app, _) = setup().await;
    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_class_validates_input() {
    let (app, _) = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/classes",
        Some(json!({ "name": "  ", "subject": "Math", "passcode": "ABCD" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Class name is required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/classes",
        Some(json!({ "name": "Algebra", "subject": "Math", "passcode": "ab" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Passcode must be at least 4 characters");
}

#[tokio::test]
async fn test_duplicate_passcode_conflicts() {
    let (app, _) = setup().await;
    create_class(&app, "MATH7").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/classes",
        Some(json!({ "name": "Other", "subject": "Science", "passcode": " MATH7 " })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_generate_passcode() {
    let (app, _) = setup().await;

    let (status, body) = send(&app, Method::POST, "/api/classes/generate-passcode", None).await;
    assert_eq!(status, StatusCode::OK);

    let passcode = body["passcode"].as_str().unwrap();
    assert_eq!(passcode.len(), AppConfig::default().passcode_length);
    assert!(passcode.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_assignment_status_and_countdown() {
    let (app, clock) = setup().await;
    let class = create_class(&app, "MATH7").await;
    let class_id = class["id"].as_str().unwrap();

    let created = create_assignment(
        &app,
        class_id,
        "Quadratics",
        now(),
        now() + Duration::hours(3),
        now() + Duration::days(1),
    )
    .await;
    assert_eq!(created["status"], "active");
    assert_eq!(created["countdown"]["hours"], 3);
    assert_eq!(created["countdown"]["isUrgent"], true);
    assert_eq!(created["file"]["originalName"], "worksheet.pdf");

    let id = created["id"].as_str().unwrap();

    clock.advance(Duration::days(2));
    let (status, body) = send(&app, Method::GET, &format!("/api/assignments/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "expired");
    assert!(body.get("countdown").is_none());

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/assignments/{id}/countdown"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "expired");
    assert_eq!(body["countdown"]["days"], 0);
    assert_eq!(body["countdown"]["isUrgent"], false);
}

#[tokio::test]
async fn test_create_assignment_rejects_bad_windows() {
    let (app, _) = setup().await;
    let class = create_class(&app, "MATH7").await;
    let class_id = class["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(json!({
            "classId": class_id,
            "title": "Backwards",
            "availableFrom": now().to_rfc3339(),
            "deadline": (now() + Duration::days(2)).to_rfc3339(),
            "expiresAt": (now() + Duration::days(1)).to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // unparseable timestamps never reach the engine
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(json!({
            "classId": class_id,
            "title": "Garbled",
            "availableFrom": "next tuesday",
            "deadline": now().to_rfc3339(),
            "expiresAt": now().to_rfc3339(),
        })),
    )
    .await;
    assert!(status.is_client_error());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(json!({
            "classId": "missing",
            "title": "Orphan",
            "availableFrom": now().to_rfc3339(),
            "deadline": now().to_rfc3339(),
            "expiresAt": now().to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_counts_active() {
    let (app, _) = setup().await;
    let class = create_class(&app, "MATH7").await;
    let class_id = class["id"].as_str().unwrap();

    let h = Duration::hours;
    create_assignment(&app, class_id, "active 1", now() - h(1), now() + h(1), now() + h(2)).await;
    create_assignment(&app, class_id, "active 2", now(), now() + h(5), now() + h(5)).await;
    create_assignment(&app, class_id, "pending 1", now() + h(1), now() + h(2), now() + h(3)).await;
    create_assignment(
        &app,
        class_id,
        "pending 2",
        now() + h(9),
        now() + h(10),
        now() + h(10),
    )
    .await;
    create_assignment(&app, class_id, "expired", now() - h(9), now() - h(3), now() - h(2)).await;
    create_assignment(&app, class_id, "sixth", now() + h(9), now() + h(10), now() + h(10)).await;

    let (status, body) = send(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalClasses"], 1);
    assert_eq!(body["totalAssignments"], 6);
    assert_eq!(body["activeAssignments"], 2);

    let recent = body["recentAssignments"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["title"], "sixth");

    let (status, body) = send(&app, Method::GET, "/api/classes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["summary"]["total"], 6);
    assert_eq!(body[0]["summary"]["activeCount"], 2);
}

#[tokio::test]
async fn test_student_access_by_passcode() {
    let (app, _) = setup().await;
    let class = create_class(&app, "MATH7").await;
    let class_id = class["id"].as_str().unwrap();

    create_assignment(
        &app,
        class_id,
        "open",
        now() - Duration::hours(1),
        now() + Duration::hours(1),
        now() + Duration::hours(2),
    )
    .await;
    create_assignment(
        &app,
        class_id,
        "later",
        now() + Duration::days(1),
        now() + Duration::days(2),
        now() + Duration::days(2),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/classes/access/MATH7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Algebra I");
    assert!(body.get("passcode").is_none());
    assert_eq!(body["summary"]["total"], 2);

    let assignments = body["assignments"].as_array().unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0]["title"], "open");
    assert!(assignments[0]["teacherNotes"].is_null());

    let (status, _) = send(&app, Method::GET, "/api/classes/access/NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_class_detail_and_delete() {
    let (app, _) = setup().await;
    let class = create_class(&app, "MATH7").await;
    let class_id = class["id"].as_str().unwrap();

    let created = create_assignment(
        &app,
        class_id,
        "open",
        now(),
        now() + Duration::days(1),
        now() + Duration::days(1),
    )
    .await;
    let assignment_id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["passcode"], "MATH7");
    assert_eq!(body["summary"]["activeCount"], 1);
    assert_eq!(body["assignments"][0]["teacherNotes"], "answer key in drawer");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let uri = format!("/api/assignments/{assignment_id}");
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/classes/{class_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_assignment() {
    let (app, _) = setup().await;
    let class = create_class(&app, "MATH7").await;
    let class_id = class["id"].as_str().unwrap();
    let created = create_assignment(
        &app,
        class_id,
        "open",
        now(),
        now() + Duration::days(1),
        now() + Duration::days(1),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(&app, Method::DELETE, &format!("/api/assignments/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/api/assignments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}
