//! Reaction entity and the like/dislike toggle state machine

use chrono::{DateTime, Utc};
use std::ops::Add;

use crate::value_objects::{ReactionKind, Snowflake};

/// One user's reaction to one comment. At most one exists per (user, comment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub comment_id: Snowflake,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(id: Snowflake, user_id: Snowflake, comment_id: Snowflake, kind: ReactionKind) -> Self {
        Self {
            id,
            user_id,
            comment_id,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// Change to apply to a comment's `likes_count` / `dislikes_count`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDelta {
    pub likes: i32,
    pub dislikes: i32,
}

impl CounterDelta {
    /// `amount` applied to the counter that tracks `kind`
    pub const fn for_kind(kind: ReactionKind, amount: i32) -> Self {
        match kind {
            ReactionKind::Like => Self {
                likes: amount,
                dislikes: 0,
            },
            ReactionKind::Dislike => Self {
                likes: 0,
                dislikes: amount,
            },
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.likes == 0 && self.dislikes == 0
    }
}

impl Add for CounterDelta {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            likes: self.likes + rhs.likes,
            dislikes: self.dislikes + rhs.dislikes,
        }
    }
}

/// What a toggle request does to the reaction ledger.
///
/// | current | requested | transition |
/// |---------|-----------|------------|
/// | none    | k         | `Create(k)` |
/// | k       | k         | `Remove(k)` |
/// | k       | other     | `Switch { from: k, to: other }` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionTransition {
    Create(ReactionKind),
    Remove(ReactionKind),
    Switch {
        from: ReactionKind,
        to: ReactionKind,
    },
}

impl ReactionTransition {
    pub fn decide(current: Option<ReactionKind>, requested: ReactionKind) -> Self {
        match current {
            None => Self::Create(requested),
            Some(existing) if existing == requested => Self::Remove(existing),
            Some(existing) => Self::Switch {
                from: existing,
                to: requested,
            },
        }
    }

    /// Counter changes implied by this transition
    pub fn deltas(self) -> CounterDelta {
        match self {
            Self::Create(kind) => CounterDelta::for_kind(kind, 1),
            Self::Remove(kind) => CounterDelta::for_kind(kind, -1),
            Self::Switch { from, to } => {
                CounterDelta::for_kind(from, -1) + CounterDelta::for_kind(to, 1)
            }
        }
    }

    /// The user's reaction once the transition has been applied
    pub fn resulting_kind(self) -> Option<ReactionKind> {
        match self {
            Self::Create(kind) | Self::Switch { to: kind, .. } => Some(kind),
            Self::Remove(_) => None,
        }
    }
}
