//! Repository traits (ports)

mod repositories;

pub use repositories::{
    CommentListing, CommentQuery, CommentRepository, CommentSort, ParentFilter,
    ReactionRepository, RepoResult, ToggleOutcome, UserRepository,
};
