//! Airport endpoints.
//!
//! - GET  `/api/airports` - list (any session)
//! - POST `/api/airports` - create (staff)

use crate::api::require_nonblank;
use crate::auth::{RequireStaff, SessionUser};
use crate::db::db_error;
use crate::models::Airport;
use crate::server::state::AppState;
use airline_web::AppError;
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// Request to register an airport.
#[derive(Debug, Deserialize)]
pub struct CreateAirportRequest {
    /// Airport name.
    pub name: String,
    /// Nearest major city.
    pub closest_big_city: String,
}

/// List all airports.
pub async fn list_airports(
    _session: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Airport>>, AppError> {
    let airports: Vec<Airport> =
        sqlx::query_as("SELECT id, name, closest_big_city FROM airports ORDER BY id")
            .fetch_all(&state.pool)
            .await
            .map_err(db_error)?;
    Ok(Json(airports))
}

/// Register an airport.
pub async fn create_airport(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Json(request): Json<CreateAirportRequest>,
) -> Result<(StatusCode, Json<Airport>), AppError> {
    require_nonblank("name", &request.name)?;
    require_nonblank("closest_big_city", &request.closest_big_city)?;

    let result = sqlx::query("INSERT INTO airports (name, closest_big_city) VALUES (?, ?)")
        .bind(&request.name)
        .bind(&request.closest_big_city)
        .execute(&state.pool)
        .await
        .map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        Json(Airport {
            id: result.last_insert_rowid(),
            name: request.name,
            closest_big_city: request.closest_big_city,
        }),
    ))
}
