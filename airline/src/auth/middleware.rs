//! Authentication extractors.
//!
//! Handlers state their access level through their arguments:
//!
//! ```rust,ignore
//! async fn list_airports(session: SessionUser, ...) -> ...   // any account
//! async fn create_airport(staff: RequireStaff, ...) -> ...   // staff only
//! ```
//!
//! Anonymous requests fail with 401 before the handler body runs; a valid
//! session without the staff flag fails `RequireStaff` with 403.

use crate::auth::sessions;
use crate::models::User;
use airline_web::AppError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Bearer token extracted from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::unauthorized("invalid authorization format, expected 'Bearer <token>'")
            })?
            .to_string();

        if token.is_empty() {
            return Err(AppError::unauthorized("empty bearer token"));
        }

        Ok(Self(token))
    }
}

/// The authenticated account behind the request.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The session's user row.
    pub user: User,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        // Tokens are UUIDs; reject garbage before touching the database.
        if Uuid::parse_str(&token).is_err() {
            return Err(AppError::unauthorized("invalid session token format"));
        }

        let pool = SqlitePool::from_ref(state);
        let user = sessions::authenticate(&pool, &token)
            .await?
            .ok_or_else(|| AppError::unauthorized("invalid or expired session"))?;

        Ok(Self { user })
    }
}

/// Like [`SessionUser`], but the account must carry the staff flag.
#[derive(Debug, Clone)]
pub struct RequireStaff {
    /// The staff user row.
    pub user: User,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireStaff
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let SessionUser { user } = SessionUser::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(AppError::forbidden("staff access required"));
        }
        Ok(Self { user })
    }
}
