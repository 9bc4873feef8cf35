//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found")]
    UserNotFound(Snowflake),

    #[error("Comment not found")]
    CommentNotFound(Snowflake),

    #[error("Parent comment not found")]
    ParentCommentNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content must not be empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Replies can only target top-level comments")]
    NestedReply,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("You are not authorized to perform this action")]
    NotCommentAuthor,

    #[error("Account is deactivated")]
    AccountDeactivated,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    /// A concurrent request changed the same reaction; safe to retry
    #[error("Reaction was modified concurrently, please retry")]
    ReactionConflict,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Account is already deactivated")]
    AlreadyDeactivated,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::ParentCommentNotFound(_) => "UNKNOWN_PARENT_COMMENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::NestedReply => "NESTED_REPLY",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",

            // Authorization
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::AccountDeactivated => "ACCOUNT_DEACTIVATED",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",
            Self::ReactionConflict => "CONFLICT",

            // Business Rules
            Self::AlreadyDeactivated => "ALREADY_DEACTIVATED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::CommentNotFound(_) | Self::ParentCommentNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
                | Self::NestedReply
                | Self::InvalidEmail
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotCommentAuthor | Self::AccountDeactivated)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists | Self::UsernameAlreadyExists | Self::ReactionConflict
        )
    }

    /// Whether the caller may reissue the same request after re-reading state
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ReactionConflict)
    }

    /// Check if this wraps an infrastructure failure
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::InternalError(_))
    }
}
