//! Reaction kind - the two ways a user can react to a comment

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }

    /// The other kind
    pub const fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(DomainError::ValidationError(format!(
                "unknown reaction kind: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for kind in [ReactionKind::Like, ReactionKind::Dislike] {
            assert_eq!(kind.as_str().parse::<ReactionKind>().unwrap(), kind);
        }
        assert!("love".parse::<ReactionKind>().is_err());
    }

    #[test]
    fn test_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReactionKind::Dislike).unwrap(),
            "\"dislike\""
        );
    }

    #[test]
    fn test_opposite() {
        assert_eq!(ReactionKind::Like.opposite(), ReactionKind::Dislike);
        assert_eq!(ReactionKind::Dislike.opposite(), ReactionKind::Like);
    }
}
