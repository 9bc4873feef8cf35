//! Comment entity - a top-level post or a direct reply

use chrono::{DateTime, Utc};

use super::reaction::CounterDelta;
use crate::value_objects::{CommentContent, ReactionKind, Snowflake};

/// Comment entity with denormalized reaction counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub content: String,
    pub likes_count: i32,
    pub dislikes_count: i32,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a fresh comment with zeroed counters
    pub fn new(new: NewComment) -> Self {
        let now = Utc::now();
        Self {
            id: new.id,
            author_id: new.author_id,
            parent_id: new.parent_id,
            content: new.content.into_inner(),
            likes_count: 0,
            dislikes_count: 0,
            is_edited: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    /// Replace the content and mark the comment as edited
    pub fn edit(&mut self, content: CommentContent) {
        self.content = content.into_inner();
        self.is_edited = true;
        self.updated_at = Utc::now();
    }

    /// Apply counter deltas, never letting a counter drop below zero
    pub fn apply_delta(&mut self, delta: CounterDelta) {
        self.likes_count = (self.likes_count + delta.likes).max(0);
        self.dislikes_count = (self.dislikes_count + delta.dislikes).max(0);
    }
}

/// Data needed to insert a comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub content: CommentContent,
}

/// Public identity of a comment author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: Snowflake,
    pub username: String,
}

/// Read model returned to callers: the comment plus everything a listing
/// shows next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub author: AuthorSummary,
    pub replies_count: i64,
    /// The requesting user's own reaction, if a user was supplied
    pub user_reaction: Option<ReactionKind>,
}

impl CommentView {
    pub fn with_reaction(mut self, reaction: Option<ReactionKind>) -> Self {
        self.user_reaction = reaction;
        self
    }
}
