//! Comment service
//!
//! Listing, reading, creating, editing and deleting comments. Caller
//! identity is always passed in explicitly; listings annotate each
//! comment with the caller's own reaction when a caller is known.

use board_core::entities::{CommentView, NewComment};
use board_core::traits::{CommentQuery, CommentSort, ParentFilter};
use board_core::{CommentContent, DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{CommentResponse, PaginatedResponse, PaginationMeta};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Build a listing query, filling in configured defaults and capping
    /// the page size at the configured maximum
    pub fn build_query(
        &self,
        parent: ParentFilter,
        sort: Option<CommentSort>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> CommentQuery {
        let config = self.ctx.comments_config();
        let limit = limit
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);
        CommentQuery::new(
            parent,
            sort.unwrap_or_default(),
            page.unwrap_or(CommentQuery::DEFAULT_PAGE),
            limit,
        )
    }

    /// List comments, one page at a time
    #[instrument(skip(self))]
    pub async fn list_comments(
        &self,
        query: CommentQuery,
        caller: Option<Snowflake>,
    ) -> ServiceResult<PaginatedResponse<CommentResponse>> {
        let listing = self.ctx.comment_repo().list(&query).await?;
        let mut items = listing.items;

        if let Some(user_id) = caller {
            if !items.is_empty() {
                let ids: Vec<Snowflake> = items.iter().map(|v| v.comment.id).collect();
                let reactions = self
                    .ctx
                    .reaction_repo()
                    .find_kinds_for_comments(user_id, &ids)
                    .await?;
                for view in &mut items {
                    view.user_reaction = reactions.get(&view.comment.id).copied();
                }
            }
        }

        let meta = PaginationMeta::new(query.page(), query.limit(), listing.total);
        Ok(PaginatedResponse::new(
            items.into_iter().map(CommentResponse::from).collect(),
            meta,
        ))
    }

    /// Get a single comment
    #[instrument(skip(self))]
    pub async fn get_comment(
        &self,
        comment_id: Snowflake,
        caller: Option<Snowflake>,
    ) -> ServiceResult<CommentView> {
        let view = self
            .ctx
            .comment_repo()
            .find_view(comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;

        self.annotate(view, caller).await
    }

    /// Create a top-level comment or a direct reply to a top-level comment
    #[instrument(skip(self, content))]
    pub async fn create_comment(
        &self,
        author_id: Snowflake,
        content: &str,
        parent_id: Option<Snowflake>,
    ) -> ServiceResult<CommentView> {
        let content = CommentContent::parse(content)?;

        if let Some(parent_id) = parent_id {
            let parent = self
                .ctx
                .comment_repo()
                .find_by_id(parent_id)
                .await?
                .ok_or(DomainError::ParentCommentNotFound(parent_id))?;

            if !parent.is_top_level() {
                warn!(parent_id = %parent_id, "Rejected reply to a reply");
                return Err(DomainError::NestedReply.into());
            }
        }

        let new_comment = NewComment {
            id: self.ctx.generate_id(),
            author_id,
            parent_id,
            content,
        };
        let comment = self.ctx.comment_repo().create(&new_comment).await?;

        info!(
            comment_id = %comment.id,
            author_id = %author_id,
            parent_id = ?parent_id,
            "Comment created"
        );

        let view = self
            .ctx
            .comment_repo()
            .find_view(comment.id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment.id))?;
        Ok(view.with_reaction(None))
    }

    /// Replace a comment's content. Only the author may edit.
    #[instrument(skip(self, content))]
    pub async fn update_comment(
        &self,
        comment_id: Snowflake,
        caller_id: Snowflake,
        content: &str,
    ) -> ServiceResult<CommentView> {
        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;

        if !comment.is_authored_by(caller_id) {
            warn!(comment_id = %comment_id, caller_id = %caller_id, "Edit rejected: not the author");
            return Err(DomainError::NotCommentAuthor.into());
        }

        let content = CommentContent::parse(content)?;
        self.ctx
            .comment_repo()
            .update_content(comment_id, &content)
            .await?;

        info!(comment_id = %comment_id, "Comment edited");

        self.get_comment(comment_id, Some(caller_id)).await
    }

    /// Delete a comment with its direct replies and all their reactions
    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        comment_id: Snowflake,
        caller_id: Snowflake,
    ) -> ServiceResult<()> {
        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;

        if !comment.is_authored_by(caller_id) {
            warn!(comment_id = %comment_id, caller_id = %caller_id, "Delete rejected: not the author");
            return Err(DomainError::NotCommentAuthor.into());
        }

        let removed = self.ctx.comment_repo().delete_cascade(comment_id).await?;

        info!(comment_id = %comment_id, removed, "Comment deleted");
        Ok(())
    }

    async fn annotate(
        &self,
        view: CommentView,
        caller: Option<Snowflake>,
    ) -> ServiceResult<CommentView> {
        let Some(user_id) = caller else {
            return Ok(view.with_reaction(None));
        };
        let reaction = self
            .ctx
            .reaction_repo()
            .find(user_id, view.comment.id)
            .await?
            .map(|r| r.kind);
        Ok(view.with_reaction(reaction))
    }
}
