//! Comment handlers
//!
//! Listing and reading allow anonymous callers; everything that writes
//! requires a bearer token.

use axum::{extract::State, Json};
use board_service::dto::{
    ApiResponse, CommentResponse, CreateCommentRequest, PaginatedResponse, UpdateCommentRequest,
};
use board_service::{CommentService, ReactionService};

use crate::extractors::{AuthUser, CommentListQuery, IdPath, OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

type CommentJson = Json<ApiResponse<CommentResponse>>;

/// List comments
///
/// GET /comments
pub async fn list_comments(
    State(state): State<AppState>,
    caller: OptionalAuthUser,
    params: CommentListQuery,
) -> ApiResult<Json<PaginatedResponse<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let query = service.build_query(params.parent, params.sort, params.page, params.limit);
    let page = service.list_comments(query, caller.user_id()).await?;
    Ok(Json(page))
}

/// Get a single comment
///
/// GET /comments/{id}
pub async fn get_comment(
    State(state): State<AppState>,
    caller: OptionalAuthUser,
    IdPath(comment_id): IdPath,
) -> ApiResult<CommentJson> {
    let view = CommentService::new(state.service_context())
        .get_comment(comment_id, caller.user_id())
        .await?;
    Ok(Json(ApiResponse::new(view.into())))
}

/// Create a comment or reply
///
/// POST /comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<CommentJson>> {
    let view = CommentService::new(state.service_context())
        .create_comment(auth.user_id, &request.content, request.parent_comment)
        .await?;
    Ok(Created(Json(ApiResponse::new(view.into()))))
}

/// Edit a comment
///
/// PUT /comments/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(comment_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<CommentJson> {
    let view = CommentService::new(state.service_context())
        .update_comment(comment_id, auth.user_id, &request.content)
        .await?;
    Ok(Json(ApiResponse::new(view.into())))
}

/// Delete a comment and its replies
///
/// DELETE /comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(comment_id): IdPath,
) -> ApiResult<NoContent> {
    CommentService::new(state.service_context())
        .delete_comment(comment_id, auth.user_id)
        .await?;
    Ok(NoContent)
}

/// Toggle a like
///
/// POST /comments/{id}/like
pub async fn like_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(comment_id): IdPath,
) -> ApiResult<CommentJson> {
    let view = ReactionService::new(state.service_context())
        .like_comment(comment_id, auth.user_id)
        .await?;
    Ok(Json(ApiResponse::new(view.into())))
}

/// Toggle a dislike
///
/// POST /comments/{id}/dislike
pub async fn dislike_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(comment_id): IdPath,
) -> ApiResult<CommentJson> {
    let view = ReactionService::new(state.service_context())
        .dislike_comment(comment_id, auth.user_id)
        .await?;
    Ok(Json(ApiResponse::new(view.into())))
}
