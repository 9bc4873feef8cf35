//! Reaction database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Mirrors the PostgreSQL `reaction_kind` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "reaction_kind", rename_all = "lowercase")]
pub enum DbReactionKind {
    Like,
    Dislike,
}

/// Row of the `comment_reactions` table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub id: i64,
    pub user_id: i64,
    pub comment_id: i64,
    pub kind: DbReactionKind,
    pub created_at: DateTime<Utc>,
}
