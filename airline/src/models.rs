//! Domain rows and field-level validation.
//!
//! One struct per table, decoded straight from sqlx rows. Response shaping
//! (nested objects, computed fields) lives with the handlers; the rules that
//! guard writes (seat grids, route endpoints) live here.

use airline_web::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A registered account.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Primary key.
    pub id: i64,
    /// Login email, unique.
    pub email: String,
    /// Salted hash, see [`crate::auth::password`].
    pub password_hash: String,
    /// Staff accounts may write to the catalog.
    pub is_staff: bool,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

/// A bearer session. The `id` is the token handed to the client.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    /// Session token (UUID v4, stored as text).
    pub id: String,
    /// Owning user.
    pub user_id: i64,
    /// Client address at login.
    pub ip_address: String,
    /// Client user agent at login.
    pub user_agent: String,
    /// Login time.
    pub created_at: DateTime<Utc>,
    /// Sessions past this instant are rejected.
    pub expires_at: DateTime<Utc>,
}

/// An airport served by the airline.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Airport {
    /// Primary key.
    pub id: i64,
    /// Airport name.
    pub name: String,
    /// Nearest major city, used for search by travellers.
    pub closest_big_city: String,
}

/// A crew member assignable to flights.
#[derive(Debug, Clone, FromRow)]
pub struct Crew {
    /// Primary key.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl Crew {
    /// `"{first_name} {last_name}"`, the display form used in flight details.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An airplane model family (e.g. wide-body jet).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AirplaneType {
    /// Primary key.
    pub id: i64,
    /// Type name.
    pub name: String,
}

/// A concrete airplane with a fixed seat grid.
#[derive(Debug, Clone, FromRow)]
pub struct Airplane {
    /// Primary key.
    pub id: i64,
    /// Tail name.
    pub name: String,
    /// Number of seat rows.
    pub rows: i64,
    /// Seats per row.
    pub seats_in_row: i64,
    /// The airplane's type.
    pub airplane_type_id: i64,
    /// Stored media path of the uploaded photo, if any.
    pub image: Option<String>,
}

impl Airplane {
    /// Total seats on board.
    #[must_use]
    pub const fn capacity(&self) -> i64 {
        self.rows * self.seats_in_row
    }

    /// Check that `(row, seat)` falls inside this airplane's seat grid.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending coordinate and the
    /// available range.
    pub fn check_seat(&self, row: i64, seat: i64) -> Result<(), AppError> {
        if !(1..=self.rows).contains(&row) {
            return Err(AppError::validation(format!(
                "row {row} is outside the available range (1..={})",
                self.rows
            )));
        }
        if !(1..=self.seats_in_row).contains(&seat) {
            return Err(AppError::validation(format!(
                "seat {seat} is outside the available range (1..={})",
                self.seats_in_row
            )));
        }
        Ok(())
    }
}

/// A directed pair of airports with a distance in kilometers.
#[derive(Debug, Clone, FromRow)]
pub struct Route {
    /// Primary key.
    pub id: i64,
    /// Departure airport.
    pub source_id: i64,
    /// Arrival airport.
    pub destination_id: i64,
    /// Distance in kilometers.
    pub distance: i64,
}

impl Route {
    /// Check that a route does not loop back to its own source.
    ///
    /// # Errors
    ///
    /// Returns a validation error when both endpoints are the same airport.
    pub fn check_endpoints(source_id: i64, destination_id: i64) -> Result<(), AppError> {
        if source_id == destination_id {
            return Err(AppError::validation(
                "source and destination airports must differ",
            ));
        }
        Ok(())
    }
}

/// A scheduled occurrence of a route on an airplane.
#[derive(Debug, Clone, FromRow)]
pub struct Flight {
    /// Primary key.
    pub id: i64,
    /// The route flown.
    pub route_id: i64,
    /// The airplane flying it.
    pub airplane_id: i64,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
}

/// A user's purchase grouping one or more tickets.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    /// Primary key.
    pub id: i64,
    /// The buyer.
    pub user_id: i64,
    /// Purchase time; listings order by this, newest first.
    pub created_at: DateTime<Utc>,
}

/// A seat reservation on a flight, owned by an order.
#[derive(Debug, Clone, FromRow)]
pub struct Ticket {
    /// Primary key.
    pub id: i64,
    /// Seat row, 1-based.
    pub row: i64,
    /// Seat within the row, 1-based.
    pub seat: i64,
    /// The flight this seat is on.
    pub flight_id: i64,
    /// The owning order.
    pub order_id: i64,
}
