use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rollcall::config::Config;
use rollcall::domain::Principal;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = rollcall::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    rollcall::api::router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, cookie, json)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login_teacher(app: &Router) -> String {
    let (status, cookie, body) = send(
        app,
        post(
            "/api/auth/teacher/login",
            None,
            &json!({"username": "teacher", "password": "1234"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    cookie.expect("session cookie")
}

async fn login_student(app: &Router, roll: &str, email: &str) -> String {
    let (status, cookie, body) = send(
        app,
        post(
            "/api/auth/student/login",
            None,
            &json!({"roll": roll, "email": email}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    cookie.expect("session cookie")
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let (status, _, body) = send(&app, get("/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_routes_require_session() {
    let app = spawn_app().await;

    for uri in ["/api/students", "/api/me/profile", "/api/dashboard", "/api/auth/me"] {
        let (status, _, _) = send(&app, get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_teacher_login_failures() {
    let app = spawn_app().await;

    let (status, cookie, body) = send(
        &app,
        post(
            "/api/auth/teacher/login",
            None,
            &json!({"username": "teacher", "password": "nope"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());
    assert_eq!(body["success"], false);

    let (status, _, _) = send(
        &app,
        post(
            "/api/auth/teacher/login",
            None,
            &json!({"username": "", "password": "1234"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_teacher_views_roster_without_bluetooth_ids() {
    let app = spawn_app().await;
    let cookie = login_teacher(&app).await;

    let (status, _, body) = send(&app, get("/api/students", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    let students = body["data"].as_array().unwrap();
    assert_eq!(students.len(), 4);
    assert!(students[0].get("bluetooth_id").is_none());

    let (status, _, _) = send(&app, get("/api/students/999", Some(&cookie))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = send(&app, get("/api/classes", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["code"], "ME101");
}

#[tokio::test]
async fn test_teacher_marks_attendance() {
    let app = spawn_app().await;
    let cookie = login_teacher(&app).await;

    let (status, _, body) = send(
        &app,
        post(
            "/api/attendance/mark",
            Some(&cookie),
            &json!({"student_id": 1, "class_id": 1, "status": "late"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["method"], "teacher");
    assert_eq!(body["data"]["status"], "late");
    assert!(body["data"]["device_id"].is_null());

    let (status, _, _) = send(
        &app,
        post(
            "/api/attendance/mark",
            Some(&cookie),
            &json!({"student_id": 42, "class_id": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, body) = send(&app, get("/api/students/1/attendance", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, _, body) = send(&app, get("/api/dashboard", Some(&cookie))).await;
    assert_eq!(body["data"]["total_events"], 1);
    assert_eq!(body["data"]["present_events"], 0);
}

#[tokio::test]
async fn test_student_cannot_use_teacher_routes() {
    let app = spawn_app().await;
    let cookie = login_student(&app, "ME101", "aarav@univ.edu").await;

    let (status, _, _) = send(&app, get("/api/students", Some(&cookie))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(
        &app,
        post(
            "/api/attendance/mark",
            Some(&cookie),
            &json!({"student_id": 1, "class_id": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_bluetooth_check_in() {
    let app = spawn_app().await;
    let cookie = login_student(&app, "ME102", "isha@univ.edu").await;

    let (status, _, body) = send(&app, get("/api/me/profile", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Isha Kapoor");
    let bluetooth_id = body["data"]["bluetooth_id"].as_str().unwrap().to_string();

    let (status, _, _) = send(
        &app,
        post(
            "/api/me/check-in",
            Some(&cookie),
            &json!({"class_id": 1, "bluetooth_id": "00:00:00:00"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = send(
        &app,
        post(
            "/api/me/check-in",
            Some(&cookie),
            &json!({"class_id": 1, "bluetooth_id": &bluetooth_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["method"], "bluetooth");
    assert_eq!(body["data"]["device_id"], bluetooth_id.as_str());

    let (_, _, body) = send(&app, get("/api/me/attendance", Some(&cookie))).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = spawn_app().await;
    let cookie = login_teacher(&app).await;

    let (status, _, body) = send(&app, get("/api/auth/me", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "teacher");

    let logout = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, logout).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(&app, get("/api/auth/me", Some(&cookie))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_flagged_and_window_validation() {
    let app = spawn_app().await;
    let cookie = login_teacher(&app).await;

    let (status, _, body) = send(&app, get("/api/attendance/flagged", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _, _) = send(
        &app,
        get(
            "/api/attendance?since=2026-01-02T00:00:00Z&until=2026-01-01T00:00:00Z",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&app, get("/api/attendance/recent?limit=0", Some(&cookie))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_bluetooth_ids_are_wrong_credentials() {
    let app = spawn_app().await;
    let cookie = login_student(&app, "ME103", "rohit@univ.edu").await;

    for presented in [String::new(), "A".repeat(65), "not-an-id".to_string()] {
        let (status, _, body) = send(
            &app,
            post(
                "/api/me/check-in",
                Some(&cookie),
                &json!({"class_id": 1, "bluetooth_id": presented}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{body}");
        assert_eq!(body["error"], "Wrong bluetooth id");
    }

    let (_, _, body) = send(&app, get("/api/me/attendance", Some(&cookie))).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_guarded_responses_carry_the_principal() {
    let app = spawn_app().await;
    let cookie = login_teacher(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/students", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let principal = response.extensions().get::<Principal>().cloned();
    assert!(matches!(
        principal,
        Some(Principal::Teacher { ref username, .. }) if username == "teacher"
    ));

    let response = app.clone().oneshot(get("/api/health", None)).await.unwrap();
    assert!(response.extensions().get::<Principal>().is_none());
}
