//! Domain entities - core business objects

mod comment;
mod reaction;
mod user;

pub use comment::{AuthorSummary, Comment, CommentView, NewComment};
pub use reaction::{CounterDelta, Reaction, ReactionTransition};
pub use user::{NewUser, User, UserRole, UserUpdate};
