//! Router configuration.
//!
//! Builds the complete Axum router. Only the routes registered here exist:
//! resources without a detail view (airports, crews, airplane types,
//! airplanes, orders) answer 404 on `/:id`, and unregistered methods on a
//! registered path answer 405.

use crate::api;
use crate::auth::handlers as user_handlers;
use crate::server::health::{health_check, readiness_check};
use crate::server::state::AppState;
use airline_web::correlation_id_layer;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router for `state`.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Catalog: list + create only
        .route(
            "/airports",
            get(api::list_airports).post(api::create_airport),
        )
        .route("/crews", get(api::list_crews).post(api::create_crew))
        .route(
            "/airplane-types",
            get(api::list_airplane_types).post(api::create_airplane_type),
        )
        .route(
            "/airplanes",
            get(api::list_airplanes).post(api::create_airplane),
        )
        .route(
            "/airplanes/:id/upload-image",
            post(api::upload_airplane_image),
        )
        // Routes and flights also expose retrieve + delete (no update)
        .route("/routes", get(api::list_routes).post(api::create_route))
        .route(
            "/routes/:id",
            get(api::get_route).delete(api::delete_route),
        )
        .route("/flights", get(api::list_flights).post(api::create_flight))
        .route(
            "/flights/:id",
            get(api::get_flight).delete(api::delete_flight),
        )
        // Orders: personal, list + create
        .route("/orders", get(api::list_orders).post(api::create_order))
        // Accounts
        .route("/user/register", post(user_handlers::register))
        .route("/user/token", post(user_handlers::token))
        .route("/user/me", get(user_handlers::me));

    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
