use axum::extract::{rejection::QueryRejection, Path, Query, State};
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::database::models::Post;
use crate::database::{ListPostsParams, StoreError};
use crate::error::{ApiError, FieldErrors};
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page_id: Option<i64>,
    pub page_size: Option<i64>,
}

/// Turn optional page parameters into a limit/offset pair.
///
/// `None` means the caller asked for the whole list. Either parameter alone
/// enables paging; the other takes its default.
pub fn resolve_page(query: &ListPostsQuery, api: &ApiConfig) -> Result<Option<ListPostsParams>, ApiError> {
    if query.page_id.is_none() && query.page_size.is_none() {
        return Ok(None);
    }

    let page_id = query.page_id.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(api.default_page_size);

    let mut field_errors = FieldErrors::new();
    if page_id < 1 {
        field_errors.insert("page_id".to_string(), "page_id must be at least 1".to_string());
    }
    if !(1..=api.max_page_size).contains(&page_size) {
        field_errors.insert(
            "page_size".to_string(),
            format!("page_size must be between 1 and {}", api.max_page_size),
        );
    }
    if !field_errors.is_empty() {
        return Err(ApiError::validation_error("Invalid pagination", Some(field_errors)));
    }

    let offset = (page_id - 1)
        .checked_mul(page_size)
        .ok_or_else(|| ApiError::field_error("page_id", "page_id is out of range"))?;

    Ok(Some(ListPostsParams {
        limit: page_size,
        offset,
    }))
}

/// GET /posts?page_id=&page_size= - newest first
pub async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<ListPostsQuery>, QueryRejection>,
) -> ApiResult<Vec<Post>> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let result = match resolve_page(&query, &state.config.api)? {
        Some(page) => state.querier.list_posts(page).await,
        None => state.querier.list_all_posts().await,
    };

    Ok(ApiResponse::success(result?))
}

/// GET /posts/:id
pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    let id = parse_id(&id, "post")?;

    match state.querier.get_post_by_id(id).await {
        Ok(post) => Ok(ApiResponse::success(post)),
        Err(StoreError::NotFound) => Err(ApiError::not_found("Post not found")),
        Err(e) => Err(e.into()),
    }
}
