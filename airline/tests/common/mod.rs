//! Shared harness for the HTTP API tests.
//!
//! Builds the full router against an in-memory database and drives it with
//! `tower::ServiceExt::oneshot`, no listening socket needed. Seeders insert
//! catalog rows directly so each test arranges exactly the data it needs.

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use airline::config::{AuthConfig, Config, DatabaseConfig, MediaConfig, ServerConfig};
use airline::{AppState, build_router, db};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tower::ServiceExt;
use uuid::Uuid;

/// A fully wired application over an in-memory database.
pub struct TestApp {
    /// The router under test.
    pub app: Router,
    /// Direct pool access for seeding and assertions.
    pub pool: SqlitePool,
    /// Per-test media directory.
    pub media_root: PathBuf,
}

/// Build the application with a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let media_root = std::env::temp_dir().join(format!("airline-media-{}", Uuid::new_v4()));
    let config = Config {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout: 5,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        auth: AuthConfig { session_ttl: 3600 },
        media: MediaConfig {
            root: media_root.clone(),
        },
    };

    let pool = db::connect(&config.database).await.expect("pool");
    db::migrate(&pool).await.expect("migrations");
    let app = build_router(AppState::new(pool.clone(), config));

    TestApp {
        app,
        pool,
        media_root,
    }
}

/// Send a JSON request and return status plus parsed body.
///
/// The body is `Value::Null` when the response has no content (204).
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    // `http::Uri` rejects raw spaces that a real client would percent-encode
    // before putting the request on the wire.
    let uri = uri.replace(' ', "%20");
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Send a request with a raw body and explicit content type.
pub async fn raw_request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: &str,
    body: Vec<u8>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body)).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// A multipart/form-data body with a single file part.
pub fn multipart_body(
    boundary: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// Register an account and return a session token for it.
pub async fn user_token(app: &Router, email: &str) -> String {
    let payload = serde_json::json!({"email": email, "password": "testpass123"});
    let (status, _) = request(
        app,
        Method::POST,
        "/api/user/register",
        None,
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed for {email}");

    login(app, email).await
}

/// Register an account, grant it the staff flag, and return a token.
pub async fn staff_token(app: &Router, pool: &SqlitePool, email: &str) -> String {
    let payload = serde_json::json!({"email": email, "password": "testpass123"});
    let (status, _) = request(app, Method::POST, "/api/user/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "register failed for {email}");

    sqlx::query("UPDATE users SET is_staff = 1 WHERE email = ?")
        .bind(email)
        .execute(pool)
        .await
        .unwrap();

    login(app, email).await
}

async fn login(app: &Router, email: &str) -> String {
    let payload = serde_json::json!({"email": email, "password": "testpass123"});
    let (status, body) = request(app, Method::POST, "/api/user/token", None, Some(payload)).await;
    assert_eq!(status, StatusCode::OK, "login failed for {email}");
    body["token"].as_str().unwrap().to_string()
}

/// Parse an RFC 3339 timestamp.
pub fn dt(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap()
        .with_timezone(&Utc)
}

pub async fn sample_airport(pool: &SqlitePool, name: &str, city: &str) -> i64 {
    sqlx::query("INSERT INTO airports (name, closest_big_city) VALUES (?, ?)")
        .bind(name)
        .bind(city)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn sample_crew(pool: &SqlitePool, first_name: &str, last_name: &str) -> i64 {
    sqlx::query("INSERT INTO crews (first_name, last_name) VALUES (?, ?)")
        .bind(first_name)
        .bind(last_name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn sample_airplane_type(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO airplane_types (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn sample_airplane(
    pool: &SqlitePool,
    name: &str,
    rows: i64,
    seats_in_row: i64,
    airplane_type_id: i64,
) -> i64 {
    sqlx::query(
        "INSERT INTO airplanes (name, \"rows\", seats_in_row, airplane_type_id)
         VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(rows)
    .bind(seats_in_row)
    .bind(airplane_type_id)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub async fn sample_route(
    pool: &SqlitePool,
    source_id: i64,
    destination_id: i64,
    distance: i64,
) -> i64 {
    sqlx::query("INSERT INTO routes (source_id, destination_id, distance) VALUES (?, ?, ?)")
        .bind(source_id)
        .bind(destination_id)
        .bind(distance)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn sample_flight(
    pool: &SqlitePool,
    route_id: i64,
    airplane_id: i64,
    departure: &str,
    arrival: &str,
) -> i64 {
    sqlx::query(
        "INSERT INTO flights (route_id, airplane_id, departure_time, arrival_time)
         VALUES (?, ?, ?, ?)",
    )
    .bind(route_id)
    .bind(airplane_id)
    .bind(dt(departure))
    .bind(dt(arrival))
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub async fn assign_crew(pool: &SqlitePool, flight_id: i64, crew_id: i64) {
    sqlx::query("INSERT INTO flight_crews (flight_id, crew_id) VALUES (?, ?)")
        .bind(flight_id)
        .bind(crew_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn sample_order(pool: &SqlitePool, user_id: i64, created_at: &str) -> i64 {
    sqlx::query("INSERT INTO orders (user_id, created_at) VALUES (?, ?)")
        .bind(user_id)
        .bind(dt(created_at))
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

pub async fn sample_ticket(
    pool: &SqlitePool,
    flight_id: i64,
    order_id: i64,
    row: i64,
    seat: i64,
) -> i64 {
    sqlx::query("INSERT INTO tickets (\"row\", seat, flight_id, order_id) VALUES (?, ?, ?, ?)")
        .bind(row)
        .bind(seat)
        .bind(flight_id)
        .bind(order_id)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

/// The user id behind an email, for direct SQL assertions.
pub async fn user_id_of(pool: &SqlitePool, email: &str) -> i64 {
    let (id,): (i64,) = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap();
    id
}

/// A small catalog: one route, one airplane, ready for flights.
pub struct CatalogIds {
    pub source: i64,
    pub destination: i64,
    pub route: i64,
    pub airplane_type: i64,
    pub airplane: i64,
}

/// Seed a minimal catalog (two airports, a route, a 20x6 airplane).
pub async fn seed_catalog(pool: &SqlitePool) -> CatalogIds {
    let source = sample_airport(pool, "Heathrow", "London").await;
    let destination = sample_airport(pool, "Charles de Gaulle", "Paris").await;
    let route = sample_route(pool, source, destination, 344).await;
    let airplane_type = sample_airplane_type(pool, "Wide-body jet").await;
    let airplane = sample_airplane(pool, "Skylark 900", 20, 6, airplane_type).await;
    CatalogIds {
        source,
        destination,
        route,
        airplane_type,
        airplane,
    }
}
