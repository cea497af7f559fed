// handlers/public/auth/login.rs - POST /login handler

use axum::extract::State;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{issue_token, verify_password};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub id: i64,
    pub username: String,
}

/// Same error for unknown user, wrong password and unusable stored hash
fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid username or password")
}

/// Token lifetime for a configured hour count, `None` when it does not fit
fn token_lifetime(hours: u64) -> Option<Duration> {
    i64::try_from(hours).ok().and_then(Duration::try_hours)
}

/// POST /login - Authenticate and receive a bearer token
///
/// ```json
/// { "username": "alice", "password": "hunter2" }
/// ```
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user = match state.querier.get_user_by_username(&req.username).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            tracing::warn!("Login failed: unknown user '{}'", req.username);
            return Err(invalid_credentials());
        }
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return Err(ApiError::internal_server_error("Login failed"));
        }
    };

    match verify_password(&req.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("Login failed: wrong password for user {}", user.id);
            return Err(invalid_credentials());
        }
        Err(e) => {
            tracing::error!("Stored password hash for user {} is unusable: {}", user.id, e);
            return Err(invalid_credentials());
        }
    }

    let security = &state.config.security;
    let lifetime = token_lifetime(security.jwt_expiry_hours).ok_or_else(|| {
        tracing::error!("Configured token lifetime {}h is out of range", security.jwt_expiry_hours);
        ApiError::internal_server_error("Login failed")
    })?;

    let issued = issue_token(user.id, &user.username, &security.jwt_secret, lifetime).map_err(|e| {
        tracing::error!("Token issuance failed: {}", e);
        ApiError::internal_server_error("Login failed")
    })?;

    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_at: issued.expires_at,
        id: user.id,
        username: user.username,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_lifetime_rejects_unrepresentable_hours() {
        assert_eq!(token_lifetime(24), Some(Duration::hours(24)));
        assert_eq!(token_lifetime(u64::MAX), None);
        assert_eq!(token_lifetime(i64::MAX as u64), None);
    }
}
