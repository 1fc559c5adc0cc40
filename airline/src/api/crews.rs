//! Crew endpoints.
//!
//! - GET  `/api/crews` - list (any session)
//! - POST `/api/crews` - create (staff)

use crate::api::require_nonblank;
use crate::auth::{RequireStaff, SessionUser};
use crate::db::db_error;
use crate::models::Crew;
use crate::server::state::AppState;
use airline_web::AppError;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Request to add a crew member.
#[derive(Debug, Deserialize)]
pub struct CreateCrewRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// A crew member with the computed display name.
#[derive(Debug, Serialize)]
pub struct CrewResponse {
    /// Crew member id.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// `"{first_name} {last_name}"`.
    pub full_name: String,
}

impl From<Crew> for CrewResponse {
    fn from(crew: Crew) -> Self {
        let full_name = crew.full_name();
        Self {
            id: crew.id,
            first_name: crew.first_name,
            last_name: crew.last_name,
            full_name,
        }
    }
}

/// List all crew members.
pub async fn list_crews(
    _session: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CrewResponse>>, AppError> {
    let crews: Vec<Crew> =
        sqlx::query_as("SELECT id, first_name, last_name FROM crews ORDER BY id")
            .fetch_all(&state.pool)
            .await
            .map_err(db_error)?;
    Ok(Json(crews.into_iter().map(CrewResponse::from).collect()))
}

/// Add a crew member.
pub async fn create_crew(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Json(request): Json<CreateCrewRequest>,
) -> Result<(StatusCode, Json<CrewResponse>), AppError> {
    require_nonblank("first_name", &request.first_name)?;
    require_nonblank("last_name", &request.last_name)?;

    let result = sqlx::query("INSERT INTO crews (first_name, last_name) VALUES (?, ?)")
        .bind(&request.first_name)
        .bind(&request.last_name)
        .execute(&state.pool)
        .await
        .map_err(db_error)?;

    let crew = Crew {
        id: result.last_insert_rowid(),
        first_name: request.first_name,
        last_name: request.last_name,
    };
    Ok((StatusCode::CREATED, Json(crew.into())))
}
