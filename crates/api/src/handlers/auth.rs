//! Handler for `POST /auth/login`.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use skudesk_core::error::CoreError;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password and return an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let credential = state
        .credentials
        .find(&input.username)
        .await?
        .ok_or_else(invalid)?;

    let password = input.password;
    let hash = credential.password_hash;
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::InternalError(format!("Password check failed: {e}")))?
        .map_err(|e| AppError::InternalError(format!("Stored password hash is invalid: {e}")))?;

    if !matches {
        tracing::warn!(username = %input.username, "Failed login attempt");
        return Err(invalid());
    }

    let access_token = generate_access_token(&credential.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;
    tracing::info!(username = %credential.username, "Operator logged in");

    Ok(Json(AuthResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
    }))
}
