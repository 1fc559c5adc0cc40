//! Axum HTTP plumbing for the airline booking service.
//!
//! This crate holds the parts of the HTTP layer that are not specific to any
//! one resource: the application error type, request extractors, the
//! correlation-id middleware and the page-number pagination envelope.
//!
//! # Request flow
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **Extractors** pull out auth, correlation and client metadata
//! 3. **Handler** runs the database operation
//! 4. **Result** maps to JSON, errors map through [`AppError`]

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod pagination;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{ClientIp, CorrelationId, UserAgent};
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};
pub use pagination::{Page, PageQuery};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
