//! Comment database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `comments` table
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub likes_count: i32,
    pub dislikes_count: i32,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment joined with its author's username and direct reply count
#[derive(Debug, Clone, FromRow)]
pub struct CommentViewModel {
    #[sqlx(flatten)]
    pub comment: CommentModel,
    pub author_username: String,
    pub replies_count: i64,
}
