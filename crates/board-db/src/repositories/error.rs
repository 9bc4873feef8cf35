//! Error handling utilities for repositories

use board_core::error::DomainError;
use board_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Map a violation of a named constraint (unique, foreign key, check) via `on_constraint`.
/// Anything `on_constraint` does not recognize becomes a database error.
pub fn map_constraint_violation<F>(e: SqlxError, on_constraint: F) -> DomainError
where
    F: FnOnce(&str) -> Option<DomainError>,
{
    let mapped = e
        .as_database_error()
        .and_then(|db_err| db_err.constraint())
        .and_then(on_constraint);

    mapped.unwrap_or_else(|| map_db_error(e))
}

pub fn user_not_found(id: Snowflake) -> DomainError {
    DomainError::UserNotFound(id)
}

pub fn comment_not_found(id: Snowflake) -> DomainError {
    DomainError::CommentNotFound(id)
}
