//! Airplane type endpoints.
//!
//! - GET  `/api/airplane-types` - list (any session)
//! - POST `/api/airplane-types` - create (staff)

use crate::api::require_nonblank;
use crate::auth::{RequireStaff, SessionUser};
use crate::db::db_error;
use crate::models::AirplaneType;
use crate::server::state::AppState;
use airline_web::AppError;
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// Request to add an airplane type.
#[derive(Debug, Deserialize)]
pub struct CreateAirplaneTypeRequest {
    /// Type name.
    pub name: String,
}

/// List all airplane types.
pub async fn list_airplane_types(
    _session: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AirplaneType>>, AppError> {
    let types: Vec<AirplaneType> =
        sqlx::query_as("SELECT id, name FROM airplane_types ORDER BY id")
            .fetch_all(&state.pool)
            .await
            .map_err(db_error)?;
    Ok(Json(types))
}

/// Add an airplane type.
pub async fn create_airplane_type(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Json(request): Json<CreateAirplaneTypeRequest>,
) -> Result<(StatusCode, Json<AirplaneType>), AppError> {
    require_nonblank("name", &request.name)?;

    let result = sqlx::query("INSERT INTO airplane_types (name) VALUES (?)")
        .bind(&request.name)
        .execute(&state.pool)
        .await
        .map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        Json(AirplaneType {
            id: result.last_insert_rowid(),
            name: request.name,
        }),
    ))
}
