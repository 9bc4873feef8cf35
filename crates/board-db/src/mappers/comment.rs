//! Comment entity <-> model mapper

use board_core::entities::{AuthorSummary, Comment, CommentView, NewComment};
use board_core::value_objects::Snowflake;

use crate::models::{CommentModel, CommentViewModel};

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.author_id),
            parent_id: model.parent_id.map(Snowflake::new),
            content: model.content,
            likes_count: model.likes_count,
            dislikes_count: model.dislikes_count,
            is_edited: model.is_edited,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Joined rows carry no caller reaction; the service layer fills it in
impl From<CommentViewModel> for CommentView {
    fn from(model: CommentViewModel) -> Self {
        let author = AuthorSummary {
            id: Snowflake::new(model.comment.author_id),
            username: model.author_username,
        };
        CommentView {
            comment: Comment::from(model.comment),
            author,
            replies_count: model.replies_count,
            user_reaction: None,
        }
    }
}

pub struct CommentInsert<'a> {
    pub id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    pub content: &'a str,
}

impl<'a> CommentInsert<'a> {
    pub fn new(comment: &'a NewComment) -> Self {
        Self {
            id: comment.id.into_inner(),
            author_id: comment.author_id.into_inner(),
            parent_id: comment.parent_id.map(Snowflake::into_inner),
            content: comment.content.as_str(),
        }
    }
}
