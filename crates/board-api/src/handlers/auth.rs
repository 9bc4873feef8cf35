//! Authentication handlers
//!
//! Endpoints for user registration, login, logout, and token refresh.

use axum::{extract::State, Json};
use board_service::dto::{
    ApiResponse, AuthResponse, CurrentUserResponse, LoginRequest, LogoutRequest,
    RefreshTokenRequest, RegisterRequest, TokenResponse,
};
use board_service::AuthService;

use crate::extractors::{AuthUser, OptionalValidatedJson, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<ApiResponse<AuthResponse>>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(ApiResponse::new(response))))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// Rotate a refresh token
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<ApiResponse<TokenResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh(request).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// Logout
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalValidatedJson(body): OptionalValidatedJson<LogoutRequest>,
) -> ApiResult<NoContent> {
    let service = AuthService::new(state.service_context());
    let refresh_token = body.unwrap_or_default().refresh_token;
    service.logout(auth.user_id, refresh_token).await?;
    Ok(NoContent)
}

/// Current user
///
/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<CurrentUserResponse>>> {
    let response = AuthService::new(state.service_context())
        .me(auth.user_id)
        .await?;
    Ok(Json(ApiResponse::new(response)))
}
