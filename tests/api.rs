//! Router tests that never reach the database: the pool connects lazily and every
//! request here is answered before a connection would be needed.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use devprojects_api::{build_app, AppConfig, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost:1/devprojects_unused".into()),
        "BODY_LIMIT_BYTES" => Some("1024".into()),
        _ => None,
    })
    .unwrap();
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(250))
        .connect_lazy(&config.database_url)
        .unwrap();
    build_app(AppState { pool }, &config)
}

async fn send(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_and_version() {
    let (status, body) = send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = send(Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "devprojects-api");
}

#[tokio::test]
async fn non_numeric_ids_are_rejected_before_lookup() {
    for (method, uri) in [
        (Method::GET, "/developers/abc"),
        (Method::DELETE, "/developers/1x"),
        (Method::GET, "/developers/abc/projects"),
        (Method::GET, "/projects/abc"),
        (Method::DELETE, "/projects/abc/technologies/React"),
    ] {
        let (status, body) = send(method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["message"].as_str().unwrap().starts_with("invalid id"), "{}", uri);
    }
}

#[tokio::test]
async fn create_developer_requires_name_and_email() {
    let (status, body) = send(Method::POST, "/developers", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required keys: name,email");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn create_project_reports_all_missing_keys() {
    let (status, body) = send(Method::POST, "/projects", Some(json!({ "name": "api" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required keys: description,estimatedTime,repository,startDate,developerId"
    );
}

#[tokio::test]
async fn create_project_validates_before_developer_lookup() {
    let project = json!({
        "name": "api",
        "description": "rest api",
        "estimatedTime": "2 weeks",
        "repository": "https://example.com/api",
        "startDate": "02/01/2023",
        "developerId": 1
    });
    let (status, body) = send(Method::POST, "/projects", Some(project)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "startDate must be a date (YYYY-MM-DD)");
}

#[tokio::test]
async fn body_must_be_an_object() {
    let (status, body) = send(Method::POST, "/projects", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "body must be a JSON object");
}

#[tokio::test]
async fn oversized_bodies_are_refused() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/projects")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, "4096")
        .body(Body::from(vec![b' '; 4096]))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn oversized_bodies_without_length_are_refused() {
    for uri in ["/developers", "/projects"] {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(vec![b' '; 4096]))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE, "{}", uri);
    }
}

#[tokio::test]
async fn body_rejections_are_json() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/projects")
        .body(Body::from("{}"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/projects")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unknown_routes_are_404() {
    let (status, _) = send(Method::GET, "/teams", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
