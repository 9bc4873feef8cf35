//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod reaction;
mod user;

pub use comment::{CommentModel, CommentViewModel};
pub use reaction::{DbReactionKind, ReactionModel};
pub use user::UserModel;
