// handlers/public/auth/register.rs - POST /register handler

use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{hash_password, password::MAX_PASSWORD_BYTES, CredentialError};
use crate::database::{CreateUserParams, StoreError};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidatedJson};
use crate::state::AppState;

use super::utils::validate_username_format;

/// Message shared by every server-side registration failure
const REGISTRATION_FAILED: &str = "Registration failed (username may be taken)";

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
    pub message: &'static str,
}

/// POST /register - Create a user account
///
/// ```json
/// { "username": "alice", "password": "hunter2" }
/// ```
///
/// A taken username and a hashing failure produce the same 500 body.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    validate_username_format(&req.username).map_err(|msg| ApiError::field_error("username", msg))?;

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(CredentialError::PasswordTooLong) => {
            return Err(ApiError::field_error(
                "password",
                format!("password must be at most {} bytes", MAX_PASSWORD_BYTES),
            ));
        }
        Err(e) => {
            tracing::error!("Password hashing failed during registration: {}", e);
            return Err(ApiError::internal_server_error(REGISTRATION_FAILED));
        }
    };

    let params = CreateUserParams {
        username: req.username,
        password_hash,
    };

    let user = state.querier.create_user(params).await.map_err(|e| {
        match &e {
            StoreError::UniqueViolation(_) => tracing::info!("Registration rejected: username taken"),
            _ => tracing::error!("Failed to create user: {}", e),
        }
        ApiError::internal_server_error(REGISTRATION_FAILED)
    })?;

    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok(ApiResponse::created(RegisterResponse {
        id: user.id,
        username: user.username,
        message: "User registered successfully.",
    }))
}
