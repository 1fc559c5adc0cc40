//! Liveness and readiness probes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::{Method, StatusCode};
use common::{request, spawn_app};

#[tokio::test]
async fn health_reports_version_without_auth() {
    let app = spawn_app().await;

    let (status, body) = request(&app.app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn readiness_confirms_database_access() {
    let app = spawn_app().await;

    let (status, body) = request(&app.app, Method::GET, "/ready", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn unknown_api_paths_are_not_found() {
    let app = spawn_app().await;

    let (status, _) = request(&app.app, Method::GET, "/api/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
