//! Application state for the HTTP server.

use crate::config::Config;
use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; both members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Database pool.
    pub pool: SqlitePool,
    /// Runtime configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create the state for a pool and configuration.
    #[must_use]
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}

// Lets the session extractors pull the pool out of any router state.
impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
