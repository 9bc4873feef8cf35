//! Model <-> entity conversions
//!
//! - `From<Model> for Entity`: database rows to domain objects
//! - `*Insert` structs: entity data prepared for binding

mod comment;
mod reaction;
mod user;

pub use comment::CommentInsert;
pub use user::UserInsert;
