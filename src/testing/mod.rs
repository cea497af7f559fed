use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::database::models::{Post, User};
use crate::database::{
    CreatePostParams, CreateUserParams, ListPostsParams, Querier, StoreError, UpdatePostParams,
};
use crate::router::app;
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    next_user_id: i64,
    next_post_id: i64,
}

/// In-memory [`Querier`] with the same constraint behaviour as the schema:
/// unique usernames, posts must reference an existing user.
#[derive(Default)]
pub struct MemoryQuerier {
    tables: RwLock<Tables>,
    unavailable: bool,
}

impl MemoryQuerier {
    /// A store whose every statement fails as if the pool were exhausted
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    pub async fn post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }
}

fn newest_first(posts: &[Post]) -> Vec<Post> {
    let mut posts = posts.to_vec();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    posts
}

#[async_trait]
impl Querier for MemoryQuerier {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn create_user(&self, params: CreateUserParams) -> Result<User, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == params.username) {
            return Err(StoreError::UniqueViolation("users_username_key".to_string()));
        }
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: params.username,
            password_hash: params.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        tables.users.iter().find(|u| u.id == id).cloned().ok_or(StoreError::NotFound)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self.tables.read().await.users.clone())
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<Post, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == params.user_id) {
            return Err(StoreError::ForeignKeyViolation("posts_user_id_fkey".to_string()));
        }
        tables.next_post_id += 1;
        let post = Post {
            id: tables.next_post_id,
            user_id: params.user_id,
            title: params.title,
            content: params.content,
            created_at: Utc::now(),
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post_by_id(&self, id: i64) -> Result<Post, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        tables.posts.iter().find(|p| p.id == id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list_all_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.check()?;
        Ok(newest_first(&self.tables.read().await.posts))
    }

    async fn list_posts(&self, params: ListPostsParams) -> Result<Vec<Post>, StoreError> {
        self.check()?;
        let posts = newest_first(&self.tables.read().await.posts);
        Ok(posts
            .into_iter()
            .skip(params.offset as usize)
            .take(params.limit as usize)
            .collect())
    }

    async fn update_post_owned(&self, params: UpdatePostParams, user_id: i64) -> Result<Post, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == params.id && p.user_id == user_id)
            .ok_or(StoreError::NotFound)?;
        apply_update(post, params);
        Ok(post.clone())
    }

    async fn update_post_any(&self, params: UpdatePostParams) -> Result<Post, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == params.id)
            .ok_or(StoreError::NotFound)?;
        apply_update(post, params);
        Ok(post.clone())
    }

    async fn delete_post_owned(&self, id: i64, user_id: i64) -> Result<u64, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| !(p.id == id && p.user_id == user_id));
        Ok((before - tables.posts.len()) as u64)
    }

    async fn delete_post_any(&self, id: i64) -> Result<u64, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok((before - tables.posts.len()) as u64)
    }
}

fn apply_update(post: &mut Post, params: UpdatePostParams) {
    post.content = params.content;
    if let Some(title) = params.title {
        post.title = Some(title);
    }
}

/// Development config with a fixed secret and request logging off
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.api.enable_request_logging = false;
    config
}

/// The real router over an in-memory store
pub struct TestContext {
    pub app: Router,
    pub querier: Arc<MemoryQuerier>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::with_querier(config, Arc::new(MemoryQuerier::default()))
    }

    pub fn with_querier(config: AppConfig, querier: Arc<MemoryQuerier>) -> Self {
        let state = AppState::new(querier.clone(), config);
        Self {
            app: app(state),
            querier,
        }
    }

    /// Send one request; returns status and parsed JSON body (`Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self.app.clone().oneshot(request).await.expect("infallible router");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Register and return the new user id
    pub async fn register(&self, username: &str, password: &str) -> i64 {
        let (status, body) = self
            .request(
                Method::POST,
                "/register",
                Some(serde_json::json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body["data"]["id"].as_i64().expect("user id")
    }

    /// Log in and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/login",
                Some(serde_json::json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["data"]["token"].as_str().expect("token").to_string()
    }
}
