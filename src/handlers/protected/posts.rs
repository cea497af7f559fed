use axum::{
    extract::{Path, State},
    Extension,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::OwnershipPolicy;
use crate::database::models::Post;
use crate::database::{CreatePostParams, StoreError, UpdatePostParams};
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, OptionalValidatedJson, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(range(min = 1, message = "user_id must be a positive integer"))]
    pub user_id: Option<i64>,
    #[validate(length(max = 200, message = "title must be at most 200 characters"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(range(min = 1, message = "user_id must be a positive integer"))]
    pub user_id: Option<i64>,
    #[validate(length(max = 200, message = "title must be at most 200 characters"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct DeletePostRequest {
    #[validate(range(min = 1, message = "user_id must be a positive integer"))]
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DeletePostResponse {
    pub id: i64,
    pub message: &'static str,
}

/// The user a mutation acts for.
///
/// With a token, the token's subject wins and a disagreeing body `user_id`
/// is refused. Without one, the body must name the owner.
fn resolve_owner(auth: Option<&AuthUser>, supplied: Option<i64>) -> Result<i64, ApiError> {
    match (auth, supplied) {
        (Some(auth), Some(user_id)) if user_id != auth.user_id => {
            tracing::warn!(
                "User {} tried to act as user {}",
                auth.user_id,
                user_id
            );
            Err(ApiError::forbidden("user_id does not match the authenticated user"))
        }
        (Some(auth), _) => Ok(auth.user_id),
        (None, Some(user_id)) => Ok(user_id),
        (None, None) => Err(ApiError::field_error("user_id", "user_id is required")),
    }
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: Option<Extension<AuthUser>>,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Post> {
    let user_id = resolve_owner(auth.as_deref(), req.user_id)?;

    let params = CreatePostParams {
        user_id,
        title: req.title,
        content: req.content,
    };

    match state.querier.create_post(params).await {
        Ok(post) => {
            tracing::info!("User {} created post {}", post.user_id, post.id);
            Ok(ApiResponse::created(post))
        }
        Err(StoreError::ForeignKeyViolation(_)) => {
            Err(ApiError::field_error("user_id", "user does not exist"))
        }
        Err(e) => Err(e.into()),
    }
}

/// PUT /posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: Option<Extension<AuthUser>>,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Post> {
    let id = parse_id(&id, "post")?;
    let user_id = resolve_owner(auth.as_deref(), req.user_id)?;

    let params = UpdatePostParams {
        id,
        title: req.title,
        content: req.content,
    };

    let result = match state.config.security.ownership_policy {
        OwnershipPolicy::Enforced => state.querier.update_post_owned(params, user_id).await,
        OwnershipPolicy::Unchecked => state.querier.update_post_any(params).await,
    };

    match result {
        Ok(post) => {
            tracing::info!("Updated post {}", post.id);
            Ok(ApiResponse::success(post))
        }
        Err(StoreError::NotFound) => {
            tracing::debug!("Update by user {} matched no post for id {}", user_id, id);
            Err(ApiError::not_found("Post not found"))
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /posts/:id
///
/// The body may be omitted when a token names the caller. A body that is
/// sent is validated like any other.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: Option<Extension<AuthUser>>,
    OptionalValidatedJson(req): OptionalValidatedJson<DeletePostRequest>,
) -> ApiResult<DeletePostResponse> {
    let id = parse_id(&id, "post")?;
    let user_id = resolve_owner(auth.as_deref(), req.user_id)?;

    let result = match state.config.security.ownership_policy {
        OwnershipPolicy::Enforced => state.querier.delete_post_owned(id, user_id).await,
        OwnershipPolicy::Unchecked => state.querier.delete_post_any(id).await,
    };

    match result {
        Ok(0) => {
            tracing::debug!("Delete by user {} matched no post for id {}", user_id, id);
            Err(ApiError::not_found("Post not found"))
        }
        Ok(_) => {
            tracing::info!("Deleted post {}", id);
            Ok(ApiResponse::success(DeletePostResponse {
                id,
                message: "Post deleted successfully",
            }))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AuthUser {
        AuthUser { user_id: 1, username: "alice".to_string() }
    }

    #[test]
    fn token_subject_is_the_owner() {
        assert_eq!(resolve_owner(Some(&alice()), None).unwrap(), 1);
        assert_eq!(resolve_owner(Some(&alice()), Some(1)).unwrap(), 1);
    }

    #[test]
    fn body_cannot_impersonate_token_subject() {
        let err = resolve_owner(Some(&alice()), Some(2)).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn anonymous_callers_must_name_owner() {
        assert_eq!(resolve_owner(None, Some(5)).unwrap(), 5);
        let err = resolve_owner(None, None).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
