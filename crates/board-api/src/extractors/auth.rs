//! Authentication extractors
//!
//! Read a bearer token from the Authorization header. `AuthUser` requires
//! an active account; `OptionalAuthUser` falls back to anonymous.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use board_common::AppError;
use board_core::Snowflake;
use board_service::AuthService;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated, active user
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Snowflake,
}

impl AuthUser {
    pub fn new(user_id: Snowflake) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        // Checks signature, expiry, token type and that the account is active
        let user = AuthService::new(app_state.service_context())
            .authenticate(bearer.token())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected access token"))?;

        Ok(AuthUser::new(user.id))
    }
}

/// Caller identity when present
///
/// A missing, malformed or expired token yields `None` rather than an error.
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<Snowflake> {
        self.0.map(|u| u.user_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(TypedHeader(Authorization(bearer))) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
        else {
            return Ok(OptionalAuthUser(None));
        };

        let app_state = AppState::from_ref(state);
        let user = app_state
            .jwt_service()
            .validate_access_token(bearer.token())
            .and_then(|claims| claims.user_id())
            .ok()
            .map(AuthUser::new);

        Ok(OptionalAuthUser(user))
    }
}
