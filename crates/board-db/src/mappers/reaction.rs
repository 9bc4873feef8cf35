//! Reaction entity <-> model mapper

use board_core::entities::Reaction;
use board_core::value_objects::{ReactionKind, Snowflake};

use crate::models::{DbReactionKind, ReactionModel};

impl From<DbReactionKind> for ReactionKind {
    fn from(kind: DbReactionKind) -> Self {
        match kind {
            DbReactionKind::Like => ReactionKind::Like,
            DbReactionKind::Dislike => ReactionKind::Dislike,
        }
    }
}

impl From<ReactionKind> for DbReactionKind {
    fn from(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Like => DbReactionKind::Like,
            ReactionKind::Dislike => DbReactionKind::Dislike,
        }
    }
}

impl From<ReactionModel> for Reaction {
    fn from(model: ReactionModel) -> Self {
        Reaction {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            comment_id: Snowflake::new(model.comment_id),
            kind: model.kind.into(),
            created_at: model.created_at,
        }
    }
}
