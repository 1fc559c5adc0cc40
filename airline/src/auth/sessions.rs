//! Session issue and validation.
//!
//! A session is a UUID v4 token stored with the client's address, user agent
//! and an expiry. The token doubles as the primary key; lookups join straight
//! to the owning user and filter out expired rows.

use crate::db::db_error;
use crate::models::{Session, User};
use airline_web::AppError;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Issue a new session for `user_id`.
///
/// # Errors
///
/// Returns a 500 error if the insert fails.
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    ip_address: &str,
    user_agent: &str,
    ttl_seconds: u64,
) -> Result<Session, AppError> {
    let now = Utc::now();
    let ttl = Duration::try_seconds(i64::try_from(ttl_seconds).unwrap_or(604_800))
        .unwrap_or_else(|| Duration::days(7));
    let session = Session {
        id: Uuid::new_v4().to_string(),
        user_id,
        ip_address: ip_address.to_string(),
        user_agent: user_agent.to_string(),
        created_at: now,
        expires_at: now + ttl,
    };

    sqlx::query(
        "INSERT INTO sessions (id, user_id, ip_address, user_agent, created_at, expires_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&session.id)
    .bind(session.user_id)
    .bind(&session.ip_address)
    .bind(&session.user_agent)
    .bind(session.created_at)
    .bind(session.expires_at)
    .execute(pool)
    .await
    .map_err(db_error)?;

    Ok(session)
}

/// Resolve a bearer token to its user.
///
/// Returns `None` for unknown or expired tokens; the caller decides how to
/// reject.
///
/// # Errors
///
/// Returns a 500 error if the lookup fails.
pub async fn authenticate(pool: &SqlitePool, token: &str) -> Result<Option<User>, AppError> {
    let user: Option<User> = sqlx::query_as(
        "SELECT u.id, u.email, u.password_hash, u.is_staff, u.created_at
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.id = ? AND s.expires_at > ?",
    )
    .bind(token)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
    .map_err(db_error)?;

    Ok(user)
}
