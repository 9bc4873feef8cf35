//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and takes the
//! caller's identity as an explicit argument.

pub mod auth;
pub mod comment;
pub mod context;
pub mod error;
pub mod reaction;
pub mod session;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::AuthService;
pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use reaction::ReactionService;
pub use session::SessionStore;
pub use user::UserService;
