//! Request and response shapes used by the integration tests

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Credentials that will not collide with earlier runs against the same database
    pub fn unique() -> Self {
        let tag = Uuid::new_v4().simple().to_string();
        let tag = &tag[..12];
        Self {
            username: format!("user_{tag}"),
            email: format!("{tag}@example.com"),
            password: "correct-horse".to_string(),
        }
    }

    pub fn login(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentRequest {
    pub content: String,
    #[serde(rename = "parentComment", skip_serializing_if = "Option::is_none")]
    pub parent_comment: Option<String>,
}

impl CreateCommentRequest {
    pub fn top_level(content: &str) -> Self {
        Self {
            content: content.to_string(),
            parent_comment: None,
        }
    }

    pub fn reply(content: &str, parent: &str) -> Self {
        Self {
            content: content.to_string(),
            parent_comment: Some(parent.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// `{"data": ...}` wrapper
#[derive(Debug, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct AuthorResponse {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub author: AuthorResponse,
    pub parent_comment: Option<String>,
    pub likes_count: i32,
    pub dislikes_count: i32,
    pub is_edited: bool,
    pub user_reaction: Option<String>,
    pub replies_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub retryable: bool,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
