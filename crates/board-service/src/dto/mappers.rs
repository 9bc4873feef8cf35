//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use board_common::TokenPair;
use board_core::entities::{AuthorSummary, CommentView, User};

use super::responses::{
    AuthResponse, AuthorResponse, CommentResponse, CurrentUserResponse, TokenResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for CurrentUserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<AuthorSummary> for AuthorResponse {
    fn from(author: AuthorSummary) -> Self {
        Self {
            id: author.id.to_string(),
            username: author.username,
        }
    }
}

// ============================================================================
// Token Mappers
// ============================================================================

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
        }
    }
}

impl AuthResponse {
    pub fn new(user: &User, tokens: TokenPair) -> Self {
        Self {
            user: CurrentUserResponse::from(user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        let comment = view.comment;
        Self {
            id: comment.id.to_string(),
            content: comment.content,
            author: AuthorResponse::from(view.author),
            parent_comment: comment.parent_id.map(|id| id.to_string()),
            likes_count: comment.likes_count,
            dislikes_count: comment.dislikes_count,
            is_edited: comment.is_edited,
            user_reaction: view.user_reaction,
            replies_count: view.replies_count,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
