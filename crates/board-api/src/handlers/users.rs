//! User handlers
//!
//! The caller's own profile and account lifecycle.

use axum::{extract::State, Json};
use board_service::dto::{ApiResponse, CurrentUserResponse, UpdateProfileRequest};
use board_service::UserService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CurrentUserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.get_profile(auth.user_id).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// PUT /users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<CurrentUserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.update_profile(auth.user_id, request).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// PUT /users/deactivate
pub async fn deactivate(State(state): State<AppState>, auth: AuthUser) -> ApiResult<NoContent> {
    UserService::new(state.service_context())
        .deactivate(auth.user_id)
        .await?;
    Ok(NoContent)
}

/// DELETE /users/account
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoContent> {
    UserService::new(state.service_context())
        .delete_account(auth.user_id)
        .await?;
    Ok(NoContent)
}
