//! Comment body text, trimmed and length-checked

use std::fmt;

use crate::error::DomainError;

/// Validated comment content: trimmed, 1..=1000 characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    pub const MIN_CHARS: usize = 1;
    pub const MAX_CHARS: usize = 1000;

    /// Trim and validate raw input.
    ///
    /// Length is counted in Unicode scalar values, not bytes.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let chars = trimmed.chars().count();

        if chars < Self::MIN_CHARS {
            return Err(DomainError::EmptyContent);
        }
        if chars > Self::MAX_CHARS {
            return Err(DomainError::ContentTooLong {
                max: Self::MAX_CHARS,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CommentContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommentContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
