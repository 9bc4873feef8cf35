//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer states what it needs; `board-db` provides the
//! PostgreSQL implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::entities::{
    Comment, CommentView, NewComment, NewUser, Reaction, ReactionTransition, User, UserUpdate,
};
use crate::error::DomainError;
use crate::value_objects::{CommentContent, ReactionKind, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by (normalized) email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &NewUser) -> RepoResult<User>;

    /// Apply a partial profile update
    async fn update_profile(&self, id: Snowflake, update: &UserUpdate) -> RepoResult<User>;

    /// Activate or deactivate an account
    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()>;

    /// Delete a user together with their comments and reactions,
    /// keeping other comments' counters consistent
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

/// Which comments a listing selects by nesting level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParentFilter {
    /// Every comment regardless of nesting
    #[default]
    Any,
    /// Comments without a parent
    TopLevel,
    /// Direct replies to the given comment
    RepliesTo(Snowflake),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentSort {
    #[default]
    Newest,
    Oldest,
    MostLiked,
    MostDisliked,
}

impl CommentSort {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::MostLiked => "most_liked",
            Self::MostDisliked => "most_disliked",
        }
    }
}

impl fmt::Display for CommentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "most_liked" => Ok(Self::MostLiked),
            "most_disliked" => Ok(Self::MostDisliked),
            other => Err(DomainError::ValidationError(format!(
                "sort must be one of newest, oldest, most_liked, most_disliked (got {other})"
            ))),
        }
    }
}

/// Page request for comment listings. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentQuery {
    pub parent: ParentFilter,
    pub sort: CommentSort,
    page: u32,
    limit: u32,
}

impl CommentQuery {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    /// Build a query, clamping `page` to at least 1 and `limit` to `1..=MAX_LIMIT`
    pub fn new(parent: ParentFilter, sort: CommentSort, page: u32, limit: u32) -> Self {
        Self {
            parent,
            sort,
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip before this page
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for CommentQuery {
    fn default() -> Self {
        Self::new(
            ParentFilter::Any,
            CommentSort::Newest,
            Self::DEFAULT_PAGE,
            Self::DEFAULT_LIMIT,
        )
    }
}

/// One page of comments plus the total matching the filter
#[derive(Debug, Clone, Default)]
pub struct CommentListing {
    pub items: Vec<CommentView>,
    pub total: i64,
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// Find comment with author and reply count (no caller reaction)
    async fn find_view(&self, id: Snowflake) -> RepoResult<Option<CommentView>>;

    /// Filtered, sorted, paginated listing with author and reply counts
    async fn list(&self, query: &CommentQuery) -> RepoResult<CommentListing>;

    /// Insert a new comment
    async fn create(&self, comment: &NewComment) -> RepoResult<Comment>;

    /// Replace content and mark as edited
    async fn update_content(&self, id: Snowflake, content: &CommentContent)
        -> RepoResult<Comment>;

    /// Delete a comment, its direct replies and every reaction on them.
    /// Returns the number of comments removed.
    async fn delete_cascade(&self, id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

/// Result of a toggle: what happened and the comment's counters afterwards
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub transition: ReactionTransition,
    pub comment: Comment,
}

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find a user's reaction to a comment
    async fn find(&self, user_id: Snowflake, comment_id: Snowflake)
        -> RepoResult<Option<Reaction>>;

    /// A user's reactions to many comments, in one round trip
    async fn find_kinds_for_comments(
        &self,
        user_id: Snowflake,
        comment_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, ReactionKind>>;

    /// Atomically apply the like/dislike toggle and the matching counter
    /// deltas. `new_id` is used if a reaction row has to be created.
    async fn toggle(
        &self,
        new_id: Snowflake,
        user_id: Snowflake,
        comment_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ToggleOutcome>;

    /// Count stored reactions on a comment as `(likes, dislikes)`
    async fn count_by_kind(&self, comment_id: Snowflake) -> RepoResult<(i64, i64)>;
}
