//! Order endpoints.
//!
//! - GET  `/api/orders` - the requesting user's orders, paginated
//! - POST `/api/orders` - buy seats, all-or-nothing
//!
//! Orders are personal. The listing only ever returns the requesting user's
//! orders, wrapped in the `{count, next, previous, results}` envelope and
//! ordered newest first. Creation inserts the order and every ticket in one
//! transaction; the first invalid seat aborts the lot.

use crate::api::flights::{FlightListItem, crew_ids_by_flight};
use crate::api::routes::RouteListItem;
use crate::auth::SessionUser;
use crate::db::db_error;
use crate::models::Airplane;
use crate::server::state::AppState;
use airline_web::{AppError, Page, PageQuery};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, SqlitePool};
use std::collections::HashMap;

/// Request to buy seats.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Seats to book; at least one.
    pub tickets: Vec<TicketPayload>,
}

/// One requested seat.
#[derive(Debug, Deserialize)]
pub struct TicketPayload {
    /// Seat row, 1-based.
    pub row: i64,
    /// Seat within the row, 1-based.
    pub seat: i64,
    /// Flight id.
    pub flight: i64,
}

/// A booked ticket as echoed from create: flight by id.
#[derive(Debug, Serialize)]
pub struct CreatedTicket {
    /// Ticket id.
    pub id: i64,
    /// Seat row.
    pub row: i64,
    /// Seat within the row.
    pub seat: i64,
    /// Flight id.
    pub flight: i64,
}

/// Response after creating an order.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    /// Order id.
    pub id: i64,
    /// The booked tickets.
    pub tickets: Vec<CreatedTicket>,
    /// Purchase time.
    pub created_at: DateTime<Utc>,
}

/// A ticket in the order listing: flight nested in list shape.
#[derive(Debug, Serialize)]
pub struct TicketDetail {
    /// Ticket id.
    pub id: i64,
    /// Seat row.
    pub row: i64,
    /// Seat within the row.
    pub seat: i64,
    /// The flight this seat is on.
    pub flight: FlightListItem,
}

/// One order in the listing.
#[derive(Debug, Serialize)]
pub struct OrderListItem {
    /// Order id.
    pub id: i64,
    /// The order's tickets.
    pub tickets: Vec<TicketDetail>,
    /// Purchase time.
    pub created_at: DateTime<Utc>,
}

/// List the requesting user's orders, newest first.
pub async fn list_orders(
    session: SessionUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<OrderListItem>>, AppError> {
    let user_id = session.user.id;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&state.pool)
        .await
        .map_err(db_error)?;

    let orders: Vec<(i64, DateTime<Utc>)> = sqlx::query_as(
        "SELECT id, created_at FROM orders WHERE user_id = ?
         ORDER BY created_at DESC, id DESC
         LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(query.limit())
    .bind(query.offset())
    .fetch_all(&state.pool)
    .await
    .map_err(db_error)?;

    let order_ids: Vec<i64> = orders.iter().map(|(id, _)| *id).collect();
    let mut tickets_by_order = tickets_for_orders(&state.pool, &order_ids).await?;

    let results = orders
        .into_iter()
        .map(|(id, created_at)| OrderListItem {
            id,
            tickets: tickets_by_order.remove(&id).unwrap_or_default(),
            created_at,
        })
        .collect();

    let count = u64::try_from(count).unwrap_or(0);
    Ok(Json(Page::new("/api/orders", query, count, results)))
}

/// Create an order with its tickets, all-or-nothing.
pub async fn create_order(
    session: SessionUser,
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    if request.tickets.is_empty() {
        return Err(AppError::validation(
            "an order must contain at least one ticket",
        ));
    }

    let created_at = Utc::now();

    // Every early return below drops the transaction, rolling the order back.
    let mut tx = state.pool.begin().await.map_err(db_error)?;

    let result = sqlx::query("INSERT INTO orders (user_id, created_at) VALUES (?, ?)")
        .bind(session.user.id)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;
    let order_id = result.last_insert_rowid();

    let mut created = Vec::with_capacity(request.tickets.len());
    for ticket in &request.tickets {
        let airplane: Option<Airplane> = sqlx::query_as(
            "SELECT a.id, a.name, a.\"rows\", a.seats_in_row, a.airplane_type_id, a.image
             FROM flights f
             JOIN airplanes a ON a.id = f.airplane_id
             WHERE f.id = ?",
        )
        .bind(ticket.flight)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;
        let airplane = airplane.ok_or_else(|| {
            AppError::validation(format!("flight {} does not exist", ticket.flight))
        })?;

        airplane.check_seat(ticket.row, ticket.seat)?;

        // Sees tickets inserted earlier in this transaction, so duplicates
        // inside one payload are caught too.
        let taken: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM tickets WHERE flight_id = ? AND \"row\" = ? AND seat = ?",
        )
        .bind(ticket.flight)
        .bind(ticket.row)
        .bind(ticket.seat)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;
        if taken.is_some() {
            return Err(AppError::validation(format!(
                "seat (row {}, seat {}) is already taken on flight {}",
                ticket.row, ticket.seat, ticket.flight
            )));
        }

        let inserted = sqlx::query(
            "INSERT INTO tickets (\"row\", seat, flight_id, order_id) VALUES (?, ?, ?, ?)",
        )
        .bind(ticket.row)
        .bind(ticket.seat)
        .bind(ticket.flight)
        .bind(order_id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        created.push(CreatedTicket {
            id: inserted.last_insert_rowid(),
            row: ticket.row,
            seat: ticket.seat,
            flight: ticket.flight,
        });
    }

    tx.commit().await.map_err(db_error)?;

    tracing::info!(
        order_id,
        user_id = session.user.id,
        tickets = created.len(),
        "order created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            id: order_id,
            tickets: created,
            created_at,
        }),
    ))
}

type TicketJoinRow = (
    i64,
    i64,
    i64,
    i64,
    i64,
    i64,
    i64,
    i64,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    i64,
);

/// Tickets grouped by order, with their flights in list shape.
async fn tickets_for_orders(
    pool: &SqlitePool,
    order_ids: &[i64],
) -> Result<HashMap<i64, Vec<TicketDetail>>, AppError> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut qb = QueryBuilder::new(
        "SELECT t.id, t.\"row\", t.seat, t.order_id,
                f.id, r.id, r.source_id, r.destination_id, a.name,
                f.departure_time, f.arrival_time,
                a.\"rows\" * a.seats_in_row
                    - (SELECT COUNT(*) FROM tickets tt WHERE tt.flight_id = f.id)
         FROM tickets t
         JOIN flights f ON f.id = t.flight_id
         JOIN routes r ON r.id = f.route_id
         JOIN airplanes a ON a.id = f.airplane_id
         WHERE t.order_id IN (",
    );
    let mut sep = qb.separated(", ");
    for id in order_ids {
        sep.push_bind(*id);
    }
    qb.push(") ORDER BY t.order_id, t.id");

    let rows: Vec<TicketJoinRow> = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

    let mut flight_ids: Vec<i64> = rows.iter().map(|row| row.4).collect();
    flight_ids.sort_unstable();
    flight_ids.dedup();
    let crews_by_flight = crew_ids_by_flight(pool, &flight_ids).await?;

    let mut map: HashMap<i64, Vec<TicketDetail>> = HashMap::new();
    for (
        ticket_id,
        row,
        seat,
        order_id,
        flight_id,
        route_id,
        source,
        destination,
        airplane_name,
        departure_time,
        arrival_time,
        tickets_available,
    ) in rows
    {
        let crews = crews_by_flight.get(&flight_id).cloned().unwrap_or_default();
        map.entry(order_id).or_default().push(TicketDetail {
            id: ticket_id,
            row,
            seat,
            flight: FlightListItem {
                id: flight_id,
                route: RouteListItem {
                    id: route_id,
                    source,
                    destination,
                },
                airplane_name,
                departure_time,
                arrival_time,
                crews,
                tickets_available,
            },
        });
    }
    Ok(map)
}
