use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Post, User};

/// Failures surfaced by a single statement
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no rows in result set")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    /// Classify a driver error by the constraint that rejected it.
    pub fn classify(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation(db_err.constraint().unwrap_or_default().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::ForeignKeyViolation(db_err.constraint().unwrap_or_default().to_string())
            }
            other => StoreError::Sqlx(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub user_id: i64,
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPostsParams {
    pub limit: i64,
    pub offset: i64,
}

/// New field values for a post. `title: None` keeps the stored title.
#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: i64,
    pub title: Option<String>,
    pub content: String,
}

/// One typed call per SQL statement.
///
/// The `_owned` statements filter on both post id and owner id, the `_any`
/// statements on post id alone. Which pair a handler uses is decided by
/// [`OwnershipPolicy`](crate::config::OwnershipPolicy).
#[async_trait]
pub trait Querier: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn create_user(&self, params: CreateUserParams) -> Result<User, StoreError>;
    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError>;
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn create_post(&self, params: CreatePostParams) -> Result<Post, StoreError>;
    async fn get_post_by_id(&self, id: i64) -> Result<Post, StoreError>;
    async fn list_all_posts(&self) -> Result<Vec<Post>, StoreError>;
    async fn list_posts(&self, params: ListPostsParams) -> Result<Vec<Post>, StoreError>;

    async fn update_post_owned(&self, params: UpdatePostParams, user_id: i64) -> Result<Post, StoreError>;
    async fn update_post_any(&self, params: UpdatePostParams) -> Result<Post, StoreError>;

    /// Returns the number of rows removed (0 or 1).
    async fn delete_post_owned(&self, id: i64, user_id: i64) -> Result<u64, StoreError>;
    async fn delete_post_any(&self, id: i64) -> Result<u64, StoreError>;
}
