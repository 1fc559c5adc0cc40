//! Airplane endpoints.
//!
//! - GET  `/api/airplanes` - list (any session)
//! - POST `/api/airplanes` - create (staff)
//! - POST `/api/airplanes/:id/upload-image` - attach a photo (staff)
//!
//! The list view shows the airplane type by name; the create view takes and
//! echoes the type id.

use crate::api::require_nonblank;
use crate::auth::{RequireStaff, SessionUser};
use crate::db::db_error;
use crate::models::Airplane;
use crate::server::state::AppState;
use airline_web::AppError;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Request to register an airplane.
#[derive(Debug, Deserialize)]
pub struct CreateAirplaneRequest {
    /// Tail name.
    pub name: String,
    /// Number of seat rows.
    pub rows: i64,
    /// Seats per row.
    pub seats_in_row: i64,
    /// Airplane type id.
    pub airplane_type: i64,
}

/// Airplane as shown in listings: type by name, capacity computed.
#[derive(Debug, Serialize)]
pub struct AirplaneListItem {
    /// Airplane id.
    pub id: i64,
    /// Tail name.
    pub name: String,
    /// Number of seat rows.
    pub rows: i64,
    /// Seats per row.
    pub seats_in_row: i64,
    /// Airplane type name.
    pub airplane_type: String,
    /// Total seats on board.
    pub capacity: i64,
}

/// Airplane as echoed from create: type by id.
#[derive(Debug, Serialize)]
pub struct CreateAirplaneResponse {
    /// Airplane id.
    pub id: i64,
    /// Tail name.
    pub name: String,
    /// Number of seat rows.
    pub rows: i64,
    /// Seats per row.
    pub seats_in_row: i64,
    /// Airplane type id.
    pub airplane_type: i64,
    /// Total seats on board.
    pub capacity: i64,
}

/// Response after storing an airplane photo.
#[derive(Debug, Serialize)]
pub struct AirplaneImageResponse {
    /// Airplane id.
    pub id: i64,
    /// Stored file name under the media root.
    pub image: String,
}

/// Fetch one airplane in list shape. Shared with the flight detail view.
pub(crate) async fn fetch_airplane_item(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<AirplaneListItem>, AppError> {
    let row: Option<(i64, String, i64, i64, String)> = sqlx::query_as(
        "SELECT a.id, a.name, a.\"rows\", a.seats_in_row, t.name
         FROM airplanes a
         JOIN airplane_types t ON t.id = a.airplane_type_id
         WHERE a.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(db_error)?;

    Ok(row.map(|(id, name, rows, seats_in_row, airplane_type)| AirplaneListItem {
        id,
        name,
        rows,
        seats_in_row,
        airplane_type,
        capacity: rows * seats_in_row,
    }))
}

/// List all airplanes.
pub async fn list_airplanes(
    _session: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AirplaneListItem>>, AppError> {
    let rows: Vec<(i64, String, i64, i64, String)> = sqlx::query_as(
        "SELECT a.id, a.name, a.\"rows\", a.seats_in_row, t.name
         FROM airplanes a
         JOIN airplane_types t ON t.id = a.airplane_type_id
         ORDER BY a.id",
    )
    .fetch_all(&state.pool)
    .await
    .map_err(db_error)?;

    let airplanes = rows
        .into_iter()
        .map(
            |(id, name, rows, seats_in_row, airplane_type)| AirplaneListItem {
                id,
                name,
                rows,
                seats_in_row,
                airplane_type,
                capacity: rows * seats_in_row,
            },
        )
        .collect();
    Ok(Json(airplanes))
}

/// Register an airplane.
pub async fn create_airplane(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Json(request): Json<CreateAirplaneRequest>,
) -> Result<(StatusCode, Json<CreateAirplaneResponse>), AppError> {
    require_nonblank("name", &request.name)?;
    if request.rows < 1 {
        return Err(AppError::validation("rows must be at least 1"));
    }
    if request.seats_in_row < 1 {
        return Err(AppError::validation("seats_in_row must be at least 1"));
    }

    let airplane_type: Option<(i64,)> = sqlx::query_as("SELECT id FROM airplane_types WHERE id = ?")
        .bind(request.airplane_type)
        .fetch_optional(&state.pool)
        .await
        .map_err(db_error)?;
    if airplane_type.is_none() {
        return Err(AppError::validation(format!(
            "airplane type {} does not exist",
            request.airplane_type
        )));
    }

    let result = sqlx::query(
        "INSERT INTO airplanes (name, \"rows\", seats_in_row, airplane_type_id)
         VALUES (?, ?, ?, ?)",
    )
    .bind(&request.name)
    .bind(request.rows)
    .bind(request.seats_in_row)
    .bind(request.airplane_type)
    .execute(&state.pool)
    .await
    .map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAirplaneResponse {
            id: result.last_insert_rowid(),
            name: request.name,
            rows: request.rows,
            seats_in_row: request.seats_in_row,
            airplane_type: request.airplane_type,
            capacity: request.rows * request.seats_in_row,
        }),
    ))
}

/// Store an uploaded photo for an airplane.
///
/// Expects a multipart body with an `image` part. The file lands under the
/// media root as `<slug-of-name>-<uuid>[.ext]` and the stored name is written
/// to the airplane row.
pub async fn upload_airplane_image(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<AirplaneImageResponse>, AppError> {
    let airplane: Option<Airplane> = sqlx::query_as(
        "SELECT id, name, \"rows\", seats_in_row, airplane_type_id, image
         FROM airplanes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await
    .map_err(db_error)?;
    let airplane = airplane.ok_or_else(|| AppError::not_found("Airplane", id))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("malformed multipart body"))?
    {
        if field.name() != Some("image") {
            continue;
        }
        if !field
            .content_type()
            .is_some_and(|ct| ct.starts_with("image/"))
        {
            return Err(AppError::validation("image must be an image upload"));
        }
        let extension = file_extension(field.file_name());
        let data = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("malformed multipart body"))?;
        upload = Some((extension, data));
        break;
    }

    let (extension, data) =
        upload.ok_or_else(|| AppError::validation("missing image field"))?;
    if data.is_empty() {
        return Err(AppError::validation("image file is empty"));
    }

    let stored_name = match extension {
        Some(ext) => format!("{}-{}.{ext}", slugify(&airplane.name), Uuid::new_v4()),
        None => format!("{}-{}", slugify(&airplane.name), Uuid::new_v4()),
    };

    let media_root = &state.config.media.root;
    tokio::fs::create_dir_all(media_root)
        .await
        .map_err(|e| AppError::internal("failed to store image").with_source(e.into()))?;
    tokio::fs::write(media_root.join(&stored_name), &data)
        .await
        .map_err(|e| AppError::internal("failed to store image").with_source(e.into()))?;

    sqlx::query("UPDATE airplanes SET image = ? WHERE id = ?")
        .bind(&stored_name)
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(db_error)?;

    tracing::info!(airplane_id = id, file = %stored_name, "airplane image stored");

    Ok(Json(AirplaneImageResponse {
        id,
        image: stored_name,
    }))
}

/// Lowercased ASCII slug of an airplane name, for stored file names.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "airplane".to_string()
    } else {
        slug
    }
}

/// A safe file extension from the uploaded file name, if it has one.
fn file_extension(file_name: Option<&str>) -> Option<String> {
    let (_, ext) = file_name?.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 5 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
