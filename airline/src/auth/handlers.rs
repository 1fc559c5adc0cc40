//! Account endpoints: register, token login, profile.

use crate::auth::middleware::SessionUser;
use crate::auth::{password, sessions};
use crate::db::db_error;
use crate::models::User;
use crate::server::state::AppState;
use airline_web::{AppError, ClientIp, UserAgent};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 5;

/// Request to create an account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login email, must be unique.
    pub email: String,
    /// Plain password, hashed before storage.
    pub password: String,
}

/// Request to exchange credentials for a session token.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Login email.
    pub email: String,
    /// Plain password.
    pub password: String,
}

/// Session token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
}

/// Public view of an account.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Account id.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Whether the account may write to the catalog.
    pub is_staff: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_staff: user.is_staff,
        }
    }
}

/// POST `/api/user/register` - create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    check_email(&request.email)?;
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&request.email)
        .fetch_optional(&state.pool)
        .await
        .map_err(db_error)?;
    if existing.is_some() {
        return Err(AppError::validation(
            "a user with that email already exists",
        ));
    }

    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, is_staff, created_at) VALUES (?, ?, 0, ?)",
    )
    .bind(&request.email)
    .bind(password::hash(&request.password))
    .bind(Utc::now())
    .execute(&state.pool)
    .await
    .map_err(db_error)?;

    let id = result.last_insert_rowid();
    tracing::info!(user_id = id, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id,
            email: request.email,
            is_staff: false,
        }),
    ))
}

/// POST `/api/user/token` - exchange credentials for a bearer token.
pub async fn token(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    UserAgent(user_agent): UserAgent,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, email, password_hash, is_staff, created_at FROM users WHERE email = ?",
    )
    .bind(&request.email)
    .fetch_optional(&state.pool)
    .await
    .map_err(db_error)?;

    // Same rejection for unknown email and wrong password.
    let user = user
        .filter(|user| password::verify(&request.password, &user.password_hash))
        .ok_or_else(|| AppError::unauthorized("unable to log in with the provided credentials"))?;

    let session = sessions::create(
        &state.pool,
        user.id,
        &ip.to_string(),
        &user_agent,
        state.config.auth.session_ttl,
    )
    .await?;

    tracing::info!(user_id = user.id, "session issued");

    Ok(Json(TokenResponse { token: session.id }))
}

/// GET `/api/user/me` - the authenticated account.
pub async fn me(session: SessionUser) -> Json<UserResponse> {
    Json(session.user.into())
}

fn check_email(email: &str) -> Result<(), AppError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
        && !email.contains(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(AppError::validation("enter a valid email address"))
    }
}
