use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::{app::build_app, config::AppConfig, state::AppState};

fn test_app() -> Router {
    build_app(AppState::in_memory(AppConfig::for_tests()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Registers a user and returns its bearer token.
async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": "secret123", "name": "Tester" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["token"].as_str().unwrap().to_owned()
}

async fn create_todo(app: &Router, token: &str, title: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/todos",
        Some(token),
        Some(json!({ "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn health_reports_ok_with_security_headers() {
    let app = test_app();
    let res = app
        .clone()
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert_eq!(res.headers()["x-frame-options"], "DENY");

    let (_, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn register_returns_user_without_hash() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "  New.User@Example.com ", "password": "secret123", "name": " Neo " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    let user = &body["data"]["user"];
    assert_eq!(user["email"], "new.user@example.com");
    assert_eq!(user["name"], "Neo");
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password_hash").is_none());
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn registering_twice_fails() {
    let app = test_app();
    register(&app, "dup@example.com").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "DUP@example.com", "password": "another1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User already exists with this email");
}

#[tokio::test]
async fn register_reports_all_violations() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "nope", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(
        body["errors"],
        json!([
            "Please provide a valid email address",
            "Password must be at least 6 characters long"
        ])
    );
}

#[tokio::test]
async fn login_errors_are_identical() {
    let app = test_app();
    register(&app, "known@example.com").await;

    let (ok_status, ok_body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "KNOWN@example.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(ok_status, StatusCode::OK);
    assert_eq!(ok_body["message"], "Login successful");
    assert_eq!(ok_body["data"]["user"]["email"], "known@example.com");

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "known@example.com", "password": "wrong-password" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ghost@example.com", "password": "secret123" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid email or password");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app();
    let req = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&to_bytes(res.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["message"], "Invalid JSON body");
}

#[tokio::test]
async fn todos_require_a_valid_token() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access token required");

    let (status, body) = send(&app, Method::GET, "/api/todos", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/todos",
        None,
        Some(json!({ "title": "sneaky" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn todo_crud_roundtrip() {
    let app = test_app();
    let token = register(&app, "crud@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(&token),
        Some(json!({ "title": "  Learn Rust ", "description": " the book " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Todo created successfully");
    let todo = &body["data"];
    assert_eq!(todo["title"], "Learn Rust");
    assert_eq!(todo["description"], "the book");
    assert_eq!(todo["completed"], false);
    assert!(todo["userId"].is_string());
    assert!(todo["createdAt"].is_string());
    let id = todo["id"].as_str().unwrap().to_owned();

    let (status, body) = send(&app, Method::GET, &format!("/api/todos/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{id}"),
        Some(&token),
        Some(json!({ "completed": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Todo updated successfully");
    assert_eq!(body["data"]["completed"], true);
    assert_eq!(body["data"]["title"], "Learn Rust");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{id}"),
        Some(&token),
        Some(json!({ "title": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Title cannot be empty"]));

    let (status, body) = send(&app, Method::DELETE, &format!("/api/todos/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Todo deleted successfully" }));

    let (status, body) = send(&app, Method::GET, &format!("/api/todos/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Todo not found");
}

#[tokio::test]
async fn create_validation_happens_before_any_write() {
    let app = test_app();
    let token = register(&app, "strict@example.com").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(&token),
        Some(json!({ "title": "x".repeat(201), "description": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([
            "Title must be less than 200 characters",
            "Description must be a string"
        ])
    );

    let (_, body) = send(&app, Method::GET, "/api/todos", Some(&token), None).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn other_users_todos_are_invisible() {
    let app = test_app();
    let alice = register(&app, "alice@example.com").await;
    let bob = register(&app, "bob@example.com").await;
    let todo = create_todo(&app, &alice, "alice's secret").await;
    let uri = format!("/api/todos/{}", todo["id"].as_str().unwrap());

    let (_, missing) = send(
        &app,
        Method::GET,
        "/api/todos/00000000-0000-0000-0000-000000000000",
        Some(&bob),
        None,
    )
    .await;

    let (status, body) = send(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, missing);

    let (status, _) = send(&app, Method::PUT, &uri, Some(&bob), Some(json!({ "completed": true }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listing) = send(&app, Method::GET, "/api/todos", Some(&bob), None).await;
    assert_eq!(listing["data"]["total"], 0);

    let (status, body) = send(&app, Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["completed"], false);
}

#[tokio::test]
async fn malformed_todo_id_is_not_found() {
    let app = test_app();
    let token = register(&app, "ids@example.com").await;
    let (status, body) = send(&app, Method::GET, "/api/todos/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Todo not found");
}

#[tokio::test]
async fn pagination_second_page() {
    let app = test_app();
    let token = register(&app, "pages@example.com").await;
    for i in 0..12 {
        create_todo(&app, &token, &format!("todo {i}")).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/todos?page=2&limit=5", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["todos"].as_array().unwrap().len(), 5);
    assert_eq!(data["total"], 12);
    assert_eq!(data["page"], 2);
    assert_eq!(data["limit"], 5);
    assert_eq!(data["totalPages"], 3);

    let (_, body) = send(&app, Method::GET, "/api/todos?page=abc&limit=", Some(&token), None).await;
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["limit"], 10);
    assert_eq!(body["data"]["todos"][0]["title"], "todo 11");
}

#[tokio::test]
async fn stats_reflect_completion() {
    let app = test_app();
    let token = register(&app, "stats@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/todos/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "total": 0, "completed": 0, "pending": 0, "completionRate": 0, "pendingRate": 0 })
    );

    let first = create_todo(&app, &token, "one").await;
    create_todo(&app, &token, "two").await;
    create_todo(&app, &token, "three").await;
    send(
        &app,
        Method::PUT,
        &format!("/api/todos/{}", first["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({ "completed": true })),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/api/todos/stats", Some(&token), None).await;
    assert_eq!(
        body["data"],
        json!({ "total": 3, "completed": 1, "pending": 2, "completionRate": 33, "pendingRate": 67 })
    );
}

#[tokio::test]
async fn unknown_routes_get_json_404() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn repeated_query_keys_use_the_first_value() {
    let app = test_app();
    let token = register(&app, "repeat@example.com").await;
    for i in 0..3 {
        create_todo(&app, &token, &format!("todo {i}")).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/todos?page=1&page=2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["todos"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, Method::GET, "/api/todos?limit=2&limit=abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["limit"], 2);
    assert_eq!(body["data"]["totalPages"], 2);

    let (status, body) = send(&app, Method::GET, "/api/todos?page=%FF&limit=x", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["limit"], 10);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = test_app();
    let (status, doc) = send(&app, Method::GET, "/api/docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["openapi"].as_str().is_some_and(|v| v.starts_with("3.")));
    assert!(doc["paths"]["/api/todos/{id}"]["put"].is_object());
    assert!(doc["paths"]["/api/auth/register"]["post"].is_object());
    assert_eq!(doc["components"]["securitySchemes"]["bearerAuth"]["scheme"], "bearer");
    assert!(doc["components"]["schemas"]["Todo"]["properties"]["userId"].is_object());
}
