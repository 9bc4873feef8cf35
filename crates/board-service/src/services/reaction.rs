//! Reaction service
//!
//! Like/dislike toggling. The repository applies the state transition and
//! the counter deltas in one transaction; this layer only orchestrates and
//! shapes the result.

use board_core::entities::CommentView;
use board_core::{DomainError, ReactionKind, Snowflake};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Toggle the caller's reaction of `kind` on a comment
    ///
    /// Same kind as the current reaction removes it, the other kind
    /// switches it, no reaction creates one. Returns the refreshed comment
    /// annotated with the caller's resulting reaction.
    #[instrument(skip(self))]
    pub async fn apply_reaction(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> ServiceResult<CommentView> {
        let outcome = self
            .ctx
            .reaction_repo()
            .toggle(self.ctx.generate_id(), user_id, comment_id, kind)
            .await?;

        info!(
            comment_id = %comment_id,
            user_id = %user_id,
            transition = ?outcome.transition,
            likes = outcome.comment.likes_count,
            dislikes = outcome.comment.dislikes_count,
            "Reaction toggled"
        );

        let view = self
            .ctx
            .comment_repo()
            .find_view(comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;

        Ok(view.with_reaction(outcome.transition.resulting_kind()))
    }

    pub async fn like_comment(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<CommentView> {
        self.apply_reaction(comment_id, user_id, ReactionKind::Like)
            .await
    }

    pub async fn dislike_comment(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<CommentView> {
        self.apply_reaction(comment_id, user_id, ReactionKind::Dislike)
            .await
    }
}
