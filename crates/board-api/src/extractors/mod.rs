//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path ids and
//! comment listing parameters.

mod auth;
mod path;
mod query;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use path::IdPath;
pub use query::{CommentListParams, CommentListQuery};
pub use validated::{OptionalValidatedJson, ValidatedJson};
