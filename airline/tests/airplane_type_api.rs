//! Airplane type catalog endpoints.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::{Method, StatusCode};
use common::{request, sample_airplane_type, spawn_app, staff_token, user_token};
use serde_json::json;

#[tokio::test]
async fn anonymous_requests_are_rejected() {
    let app = spawn_app().await;

    let (status, _) = request(&app.app, Method::GET, "/api/airplane-types", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authenticated_users_can_list_types() {
    let app = spawn_app().await;
    let token = user_token(&app.app, "user@example.com").await;

    sample_airplane_type(&app.pool, "Wide-body jet").await;
    sample_airplane_type(&app.pool, "Turboprop").await;

    let (status, body) = request(
        &app.app,
        Method::GET,
        "/api/airplane-types",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Wide-body jet");
    assert_eq!(items[1]["name"], "Turboprop");
}

#[tokio::test]
async fn staff_can_create_types() {
    let app = spawn_app().await;
    let token = staff_token(&app.app, &app.pool, "admin@example.com").await;

    let payload = json!({"name": "Wide-body jet"});
    let (status, body) = request(
        &app.app,
        Method::POST,
        "/api/airplane-types",
        Some(&token),
        Some(payload),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Wide-body jet");
}

#[tokio::test]
async fn non_staff_cannot_create_types() {
    let app = spawn_app().await;
    let token = user_token(&app.app, "user@example.com").await;

    let payload = json!({"name": "Wide-body jet"});
    let (status, _) = request(
        &app.app,
        Method::POST,
        "/api/airplane-types",
        Some(&token),
        Some(payload),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let app = spawn_app().await;
    let token = staff_token(&app.app, &app.pool, "admin@example.com").await;

    let payload = json!({"name": "  "});
    let (status, body) = request(
        &app.app,
        Method::POST,
        "/api/airplane-types",
        Some(&token),
        Some(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
