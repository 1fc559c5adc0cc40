//! Flight endpoints.
//!
//! - GET    `/api/flights` - list with filters (any session)
//! - POST   `/api/flights` - create (staff)
//! - GET    `/api/flights/:id` - detail with seat map (any session)
//! - DELETE `/api/flights/:id` - delete (staff)
//!
//! List filters: `?airplane=` (case-insensitive contains on the airplane
//! name), `?crews=1,2` (flights having any of the crew ids), and
//! `?depart_date=YYYY-MM-DD` (calendar date of departure). The list view
//! carries `tickets_available`; the detail view instead carries the taken
//! places so a client can render the seat grid.

use crate::api::airplanes::{self, AirplaneListItem};
use crate::api::routes::{RouteDetail, RouteListItem, fetch_route_detail};
use crate::auth::{RequireStaff, SessionUser};
use crate::db::db_error;
use crate::models::Crew;
use crate::server::state::AppState;
use airline_web::AppError;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, SqlitePool};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Query parameters accepted by the flight listing.
#[derive(Debug, Default, Deserialize)]
pub struct FlightFilter {
    /// Substring match on the airplane name, case-insensitive.
    pub airplane: Option<String>,
    /// Comma-separated crew ids; flights having any of them match.
    pub crews: Option<String>,
    /// Calendar date of departure, `YYYY-MM-DD`.
    pub depart_date: Option<String>,
}

/// Request to schedule a flight.
#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    /// Route id.
    pub route: i64,
    /// Airplane id.
    pub airplane: i64,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Crew ids to assign; duplicates collapse.
    #[serde(default)]
    pub crews: Vec<i64>,
}

/// Flight as shown in listings.
#[derive(Debug, Serialize)]
pub struct FlightListItem {
    /// Flight id.
    pub id: i64,
    /// The route in list shape.
    pub route: RouteListItem,
    /// Name of the airplane flying the route.
    pub airplane_name: String,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Assigned crew ids.
    pub crews: Vec<i64>,
    /// Seats still free: capacity minus sold tickets.
    pub tickets_available: i64,
}

/// Flight as echoed from create: referenced ids only.
#[derive(Debug, Serialize)]
pub struct CreateFlightResponse {
    /// Flight id.
    pub id: i64,
    /// Route id.
    pub route: i64,
    /// Airplane id.
    pub airplane: i64,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Assigned crew ids, deduplicated and sorted.
    pub crews: Vec<i64>,
}

/// An occupied seat on a flight.
#[derive(Debug, Serialize)]
pub struct TakenPlace {
    /// Seat row.
    pub row: i64,
    /// Seat within the row.
    pub seat: i64,
}

/// Flight detail: nested route and airplane, crew names, occupied seats.
#[derive(Debug, Serialize)]
pub struct FlightDetail {
    /// Flight id.
    pub id: i64,
    /// The route with nested airports.
    pub route: RouteDetail,
    /// The airplane in list shape (type name, capacity).
    pub airplane: AirplaneListItem,
    /// Full names of the assigned crew.
    pub crews: Vec<String>,
    /// Seats already sold.
    pub taken_places: Vec<TakenPlace>,
}

type FlightListRow = (
    i64,
    i64,
    i64,
    i64,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    i64,
);

/// List flights, optionally filtered.
pub async fn list_flights(
    _session: SessionUser,
    State(state): State<AppState>,
    Query(filter): Query<FlightFilter>,
) -> Result<Json<Vec<FlightListItem>>, AppError> {
    let mut qb = QueryBuilder::new(
        "SELECT f.id, r.id, r.source_id, r.destination_id, a.name,
                f.departure_time, f.arrival_time,
                a.\"rows\" * a.seats_in_row
                    - (SELECT COUNT(*) FROM tickets t WHERE t.flight_id = f.id)
         FROM flights f
         JOIN routes r ON r.id = f.route_id
         JOIN airplanes a ON a.id = f.airplane_id
         WHERE 1 = 1",
    );

    if let Some(name) = filter.airplane.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND LOWER(a.name) LIKE ")
            .push_bind(like_pattern(name))
            .push(" ESCAPE '\\'");
    }

    if let Some(raw) = filter.crews.as_deref().filter(|s| !s.trim().is_empty()) {
        let crew_ids = parse_crew_ids(raw)?;
        qb.push(" AND f.id IN (SELECT fc.flight_id FROM flight_crews fc WHERE fc.crew_id IN (");
        let mut sep = qb.separated(", ");
        for id in &crew_ids {
            sep.push_bind(*id);
        }
        qb.push("))");
    }

    if let Some(raw) = filter.depart_date.as_deref().filter(|s| !s.is_empty()) {
        let date = parse_depart_date(raw)?;
        qb.push(" AND date(f.departure_time) = ").push_bind(date);
    }

    qb.push(" ORDER BY f.id");

    let rows: Vec<FlightListRow> = qb
        .build_query_as()
        .fetch_all(&state.pool)
        .await
        .map_err(db_error)?;

    let flight_ids: Vec<i64> = rows.iter().map(|row| row.0).collect();
    let mut crews_by_flight = crew_ids_by_flight(&state.pool, &flight_ids).await?;

    let flights = rows
        .into_iter()
        .map(
            |(id, route_id, source, destination, airplane_name, departure, arrival, available)| {
                FlightListItem {
                    id,
                    route: RouteListItem {
                        id: route_id,
                        source,
                        destination,
                    },
                    airplane_name,
                    departure_time: departure,
                    arrival_time: arrival,
                    crews: crews_by_flight.remove(&id).unwrap_or_default(),
                    tickets_available: available,
                }
            },
        )
        .collect();
    Ok(Json(flights))
}

/// Schedule a flight.
pub async fn create_flight(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Json(request): Json<CreateFlightRequest>,
) -> Result<(StatusCode, Json<CreateFlightResponse>), AppError> {
    let route: Option<(i64,)> = sqlx::query_as("SELECT id FROM routes WHERE id = ?")
        .bind(request.route)
        .fetch_optional(&state.pool)
        .await
        .map_err(db_error)?;
    if route.is_none() {
        return Err(AppError::validation(format!(
            "route {} does not exist",
            request.route
        )));
    }

    let airplane: Option<(i64,)> = sqlx::query_as("SELECT id FROM airplanes WHERE id = ?")
        .bind(request.airplane)
        .fetch_optional(&state.pool)
        .await
        .map_err(db_error)?;
    if airplane.is_none() {
        return Err(AppError::validation(format!(
            "airplane {} does not exist",
            request.airplane
        )));
    }

    let crew_ids: BTreeSet<i64> = request.crews.iter().copied().collect();
    if !crew_ids.is_empty() {
        let mut qb = QueryBuilder::new("SELECT id FROM crews WHERE id IN (");
        let mut sep = qb.separated(", ");
        for id in &crew_ids {
            sep.push_bind(*id);
        }
        qb.push(")");
        let found: Vec<(i64,)> = qb
            .build_query_as()
            .fetch_all(&state.pool)
            .await
            .map_err(db_error)?;
        let found: HashSet<i64> = found.into_iter().map(|(id,)| id).collect();
        if let Some(missing) = crew_ids.iter().find(|id| !found.contains(id)) {
            return Err(AppError::validation(format!(
                "crew {missing} does not exist"
            )));
        }
    }

    let mut tx = state.pool.begin().await.map_err(db_error)?;

    let result = sqlx::query(
        "INSERT INTO flights (route_id, airplane_id, departure_time, arrival_time)
         VALUES (?, ?, ?, ?)",
    )
    .bind(request.route)
    .bind(request.airplane)
    .bind(request.departure_time)
    .bind(request.arrival_time)
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;
    let flight_id = result.last_insert_rowid();

    for crew_id in &crew_ids {
        sqlx::query("INSERT INTO flight_crews (flight_id, crew_id) VALUES (?, ?)")
            .bind(flight_id)
            .bind(crew_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
    }

    tx.commit().await.map_err(db_error)?;

    tracing::info!(flight_id, "flight scheduled");

    Ok((
        StatusCode::CREATED,
        Json(CreateFlightResponse {
            id: flight_id,
            route: request.route,
            airplane: request.airplane,
            departure_time: request.departure_time,
            arrival_time: request.arrival_time,
            crews: crew_ids.into_iter().collect(),
        }),
    ))
}

/// Flight detail with the seat map.
pub async fn get_flight(
    _session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FlightDetail>, AppError> {
    let flight: Option<(i64, i64, i64)> =
        sqlx::query_as("SELECT id, route_id, airplane_id FROM flights WHERE id = ?")
            .bind(id)
            .fetch_optional(&state.pool)
            .await
            .map_err(db_error)?;
    let (flight_id, route_id, airplane_id) =
        flight.ok_or_else(|| AppError::not_found("Flight", id))?;

    // Both referents exist while the flight does (FK cascade).
    let route = fetch_route_detail(&state.pool, route_id)
        .await?
        .ok_or_else(|| AppError::internal("flight references a missing route"))?;
    let airplane = airplanes::fetch_airplane_item(&state.pool, airplane_id)
        .await?
        .ok_or_else(|| AppError::internal("flight references a missing airplane"))?;

    let crew_rows: Vec<(i64, String, String)> = sqlx::query_as(
        "SELECT c.id, c.first_name, c.last_name
         FROM flight_crews fc
         JOIN crews c ON c.id = fc.crew_id
         WHERE fc.flight_id = ?
         ORDER BY c.id",
    )
    .bind(flight_id)
    .fetch_all(&state.pool)
    .await
    .map_err(db_error)?;
    let crews = crew_rows
        .into_iter()
        .map(|(id, first_name, last_name)| {
            Crew {
                id,
                first_name,
                last_name,
            }
            .full_name()
        })
        .collect();

    let places: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT \"row\", seat FROM tickets WHERE flight_id = ? ORDER BY \"row\", seat",
    )
    .bind(flight_id)
    .fetch_all(&state.pool)
    .await
    .map_err(db_error)?;
    let taken_places = places
        .into_iter()
        .map(|(row, seat)| TakenPlace { row, seat })
        .collect();

    Ok(Json(FlightDetail {
        id: flight_id,
        route,
        airplane,
        crews,
        taken_places,
    }))
}

/// Delete a flight (and, by cascade, its tickets).
pub async fn delete_flight(
    _staff: RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM flights WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(db_error)?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Flight", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Crew ids grouped by flight, for the given flights.
pub(crate) async fn crew_ids_by_flight(
    pool: &SqlitePool,
    flight_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>, AppError> {
    if flight_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut qb = QueryBuilder::new("SELECT flight_id, crew_id FROM flight_crews WHERE flight_id IN (");
    let mut sep = qb.separated(", ");
    for id in flight_ids {
        sep.push_bind(*id);
    }
    qb.push(") ORDER BY flight_id, crew_id");

    let pairs: Vec<(i64, i64)> = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

    let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
    for (flight_id, crew_id) in pairs {
        map.entry(flight_id).or_default().push(crew_id);
    }
    Ok(map)
}

fn parse_crew_ids(raw: &str) -> Result<Vec<i64>, AppError> {
    raw.split(',')
        .map(|part| part.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| AppError::validation("crews must be a comma-separated list of ids"))
}

fn parse_depart_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation("depart_date must be a date formatted YYYY-MM-DD"))
}

/// `%needle%` with LIKE wildcards in the needle escaped.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn crew_ids_parse_with_spaces() {
        assert_eq!(parse_crew_ids("1,2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_crew_ids("4, 5").unwrap(), vec![4, 5]);
        assert_eq!(parse_crew_ids("7").unwrap(), vec![7]);
    }

    #[test]
    fn malformed_crew_ids_are_rejected() {
        assert!(parse_crew_ids("1,x").is_err());
        assert!(parse_crew_ids("1,,2").is_err());
        assert!(parse_crew_ids("one").is_err());
    }

    #[test]
    fn depart_dates_parse_strictly() {
        assert_eq!(
            parse_depart_date("2024-06-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );
        assert!(parse_depart_date("02-06-2024").is_err());
        assert!(parse_depart_date("2024-13-01").is_err());
        assert!(parse_depart_date("yesterday").is_err());
    }

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(like_pattern("Sky"), "%sky%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
