//! REST endpoints for the flight catalog and orders.
//!
//! One module per resource. Reads require a session, catalog writes require
//! staff, and orders are scoped to the requesting user. Response shapes
//! differ between list and detail views on purpose; see each module.

pub mod airplane_types;
pub mod airplanes;
pub mod airports;
pub mod crews;
pub mod flights;
pub mod orders;
pub mod routes;

pub use airplane_types::{create_airplane_type, list_airplane_types};
pub use airplanes::{create_airplane, list_airplanes, upload_airplane_image};
pub use airports::{create_airport, list_airports};
pub use crews::{create_crew, list_crews};
pub use flights::{create_flight, delete_flight, get_flight, list_flights};
pub use orders::{create_order, list_orders};
pub use routes::{create_route, delete_route, get_route, list_routes};

use airline_web::AppError;

/// Reject blank text fields the way form validation would.
pub(crate) fn require_nonblank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be blank")));
    }
    Ok(())
}
