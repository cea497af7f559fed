use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::{Post, User};
use crate::database::querier::{
    CreatePostParams, CreateUserParams, ListPostsParams, Querier, StoreError, UpdatePostParams,
};

const USER_COLUMNS: &str = "id, username, password_hash, created_at";
const POST_COLUMNS: &str = "id, user_id, title, content, created_at";

/// [`Querier`] backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgQuerier {
    pool: PgPool,
}

impl PgQuerier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Querier for PgQuerier {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(StoreError::classify)?;
        Ok(())
    }

    async fn create_user(&self, params: CreateUserParams) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&params.username)
            .bind(&params.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<Post, StoreError> {
        let sql = format!(
            "INSERT INTO posts (user_id, title, content) VALUES ($1, $2, $3) RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(params.user_id)
            .bind(&params.title)
            .bind(&params.content)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn get_post_by_id(&self, id: i64) -> Result<Post, StoreError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn list_all_posts(&self) -> Result<Vec<Post>, StoreError> {
        let sql = format!(
            "SELECT {} FROM posts ORDER BY created_at DESC, id DESC",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn list_posts(&self, params: ListPostsParams) -> Result<Vec<Post>, StoreError> {
        let sql = format!(
            "SELECT {} FROM posts ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn update_post_owned(&self, params: UpdatePostParams, user_id: i64) -> Result<Post, StoreError> {
        let sql = format!(
            "UPDATE posts SET content = $2, title = COALESCE($3, title) \
             WHERE id = $1 AND user_id = $4 RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(params.id)
            .bind(&params.content)
            .bind(&params.title)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn update_post_any(&self, params: UpdatePostParams) -> Result<Post, StoreError> {
        let sql = format!(
            "UPDATE posts SET content = $2, title = COALESCE($3, title) \
             WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(params.id)
            .bind(&params.content)
            .bind(&params.title)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn delete_post_owned(&self, id: i64, user_id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::classify)?;
        Ok(result.rows_affected())
    }

    async fn delete_post_any(&self, id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::classify)?;
        Ok(result.rows_affected())
    }
}
