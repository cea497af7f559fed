use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
