//! Route endpoints.
//!
//! - GET    `/api/routes` - list (any session)
//! - POST   `/api/routes` - create (staff)
//! - GET    `/api/routes/:id` - detail with nested airports (any session)
//! - DELETE `/api/routes/:id` - delete (staff)
//!
//! The list view shows airport ids and omits the distance; the detail view
//! nests full airport objects.

use crate::auth::{RequireStaff, SessionUser};
use crate::db::db_error;
use crate::models::{Airport, Route};
use crate::server::state::AppState;
use airline_web::AppError;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Request to create a route.
#[derive(Debug, Deserialize)]
pub struct CreateRouteRequest {
    /// Departure airport id.
    pub source: i64,
    /// Arrival airport id.
    pub destination: i64,
    /// Distance in kilometers.
    pub distance: i64,
}

/// Route as shown in listings: endpoint ids only.
#[derive(Debug, Serialize)]
pub struct RouteListItem {
    /// Route id.
    pub id: i64,
    /// Departure airport id.
    pub source: i64,
    /// Arrival airport id.
    pub destination: i64,
}

/// Route as echoed from create.
#[derive(Debug, Serialize)]
pub struct CreateRouteResponse {
    /// Route id.
    pub id: i64,
    /// Departure airport id.
    pub source: i64,
    /// Arrival airport id.
    pub destination: i64,
    /// Distance in kilometers.
    pub distance: i64,
}

/// Route detail with nested airports.
#[derive(Debug, Serialize)]
pub struct RouteDetail {
    /// Route id.
    pub id: i64,
    /// Departure airport.
    pub source: Airport,
    /// Arrival airport.
    pub destination: Airport,
    /// Distance in kilometers.
    pub distance: i64,
}

/// Fetch one route in detail shape. Shared with the flight detail view.
pub(crate) async fn fetch_route_detail(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<RouteDetail>, AppError> {
    let row: Option<(i64, i64, i64, String, String, i64, String, String)> = sqlx::query_as(
        "SELECT r.id, r.distance,
                s.id, s.name, s.closest_big_city,
                d.id, d.name, d.closest_big_city
         FROM routes r
         JOIN airports s ON s.id = r.source_id
         JOIN airports d ON d.id = r.destination_id
         WHERE r.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(db_error)?;

    Ok(row.map(
        |(id, distance, src_id, src_name, src_city, dst_id, dst_name, dst_city)| RouteDetail {
            id,
            source: Airport {
                id: src_id,
                name: src_name,
                closest_big_city: src_city,
            },
            destination: Airport {
                id: dst_id,
                name: dst_name,
                closest_big_city: dst_city,
            },
            distance,
        },
    ))
}

/// List all routes.
pub async fn list_routes(
    _session: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<RouteListItem>>, AppError> {
    let rows: Vec<(i64, i64, i64)> =
        sqlx::query_as("SELECT id, source_id, destination_id FROM routes ORDER BY id")
            .fetch_all(&state.pool)
            .await
            .map_err(db_error)?;

    let routes = rows
        .into_iter()
        .map(|(id, source, destination)| RouteListItem {
            id,
            source,
            destination,
        })
        .collect();
    Ok(Json(routes))
}

/// Create a route between two airports.
pub async fn create_route(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<CreateRouteResponse>), AppError> {
    Route::check_endpoints(request.source, request.destination)?;

    for (label, airport_id) in [("source", request.source), ("destination", request.destination)]
    {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM airports WHERE id = ?")
            .bind(airport_id)
            .fetch_optional(&state.pool)
            .await
            .map_err(db_error)?;
        if exists.is_none() {
            return Err(AppError::validation(format!(
                "{label} airport {airport_id} does not exist"
            )));
        }
    }

    let duplicate: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM routes WHERE source_id = ? AND destination_id = ?")
            .bind(request.source)
            .bind(request.destination)
            .fetch_optional(&state.pool)
            .await
            .map_err(db_error)?;
    if duplicate.is_some() {
        return Err(AppError::validation(
            "a route between these airports already exists",
        ));
    }

    let result = sqlx::query(
        "INSERT INTO routes (source_id, destination_id, distance) VALUES (?, ?, ?)",
    )
    .bind(request.source)
    .bind(request.destination)
    .bind(request.distance)
    .execute(&state.pool)
    .await
    .map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRouteResponse {
            id: result.last_insert_rowid(),
            source: request.source,
            destination: request.destination,
            distance: request.distance,
        }),
    ))
}

/// Route detail with nested airport objects.
pub async fn get_route(
    _session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RouteDetail>, AppError> {
    let route = fetch_route_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Route", id))?;
    Ok(Json(route))
}

/// Delete a route (and, by cascade, its flights and their tickets).
pub async fn delete_route(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM routes WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(db_error)?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Route", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
