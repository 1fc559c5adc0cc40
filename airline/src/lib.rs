//! Airline booking service.
//!
//! A REST backend for an airline ticketing operation. It manages the flight
//! catalog (airports, routes, airplane types, airplanes, crews, flights) and
//! sells seats on those flights through orders.
//!
//! # Architecture
//!
//! ```text
//!                ┌────────────────────────────────────┐
//!                │            Axum router             │
//!                │  /api/airports   /api/routes  ...  │
//!                └────────────────────────────────────┘
//!                    │                        │
//!             auth extractors          resource handlers
//!          (bearer token, staff)      (filters, validation)
//!                    │                        │
//!                    └──────────┬─────────────┘
//!                               ▼
//!                        SQLite via sqlx
//! ```
//!
//! Reads of the catalog require a valid session; writes require a staff
//! account. Orders are personal: every user sees only what they booked.
//! Order creation writes the order and all of its tickets in one
//! transaction so a rejected seat never leaves a half-booked order behind.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod server;

pub use config::Config;
pub use server::{build_router, AppState};
