//! Value objects - immutable types that represent domain concepts

mod comment_content;
mod reaction_kind;
mod snowflake;

pub use comment_content::CommentContent;
pub use reaction_kind::ReactionKind;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
