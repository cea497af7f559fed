use axum::extract::{Path, State};

use crate::database::models::User;
use crate::database::StoreError;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /users - every user, ordered by id
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.querier.list_users().await?;

    Ok(ApiResponse::success(users))
}

/// GET /users/:id
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    let id = parse_id(&id, "user")?;

    match state.querier.get_user_by_id(id).await {
        Ok(user) => Ok(ApiResponse::success(user)),
        Err(StoreError::NotFound) => Err(ApiError::not_found("User not found")),
        Err(e) => Err(e.into()),
    }
}
