//! # board-core
//!
//! Domain layer for the comment board: entities, value objects, the reaction
//! state machine and repository traits. No infrastructure dependencies.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AuthorSummary, Comment, CommentView, CounterDelta, NewComment, NewUser, Reaction,
    ReactionTransition, User, UserRole, UserUpdate,
};
pub use error::DomainError;
pub use traits::{
    CommentListing, CommentQuery, CommentRepository, CommentSort, ParentFilter,
    ReactionRepository, RepoResult, ToggleOutcome, UserRepository,
};
pub use value_objects::{
    CommentContent, ReactionKind, Snowflake, SnowflakeGenerator, SnowflakeParseError,
};
