//! Authentication service
//!
//! Handles user registration, login, token refresh, and logout.
//!
//! Every token pair is bound to a refresh session id. Refreshing consumes
//! the old session before a new one is issued, so each refresh token can
//! be exchanged at most once.

use board_cache::RefreshSession;
use board_common::auth::validate_password_strength;
use board_common::AppError;
use board_core::entities::{NewUser, User};
use board_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, RefreshTokenRequest, RegisterRequest,
    TokenResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password)?;

        let username = request.username.trim().to_string();
        let email = User::normalize_email(&request.email);

        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }
        if self.ctx.user_repo().username_exists(&username).await? {
            return Err(DomainError::UsernameAlreadyExists.into());
        }

        let password_hash = self.ctx.password_service().hash(&request.password)?;

        let user = self
            .ctx
            .user_repo()
            .create(&NewUser {
                id: self.ctx.generate_id(),
                username,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User registered successfully");

        let tokens = self.start_session(user.id).await?;
        Ok(AuthResponse::new(&user, tokens))
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                AppError::InvalidCredentials
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if let Err(e) = self
            .ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
        {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(e.into());
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login rejected: account deactivated");
            return Err(AppError::AccountDeactivated.into());
        }

        info!(user_id = %user.id, "User logged in successfully");

        let tokens = self.start_session(user.id).await?;
        Ok(AuthResponse::new(&user, tokens))
    }

    /// Exchange a refresh token for a new token pair, revoking the old one
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<TokenResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;
        let session_id = claims.session_id.ok_or(AppError::InvalidToken)?;

        let session = self
            .ctx
            .sessions()
            .consume(&session_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Refresh rejected: session revoked or already used");
                AppError::InvalidToken
            })?;

        if session.user_id != user_id {
            return Err(AppError::InvalidToken.into());
        }

        match self.ctx.user_repo().find_by_id(user_id).await? {
            Some(user) if user.is_active => {}
            _ => return Err(AppError::InvalidToken.into()),
        }

        let tokens = self.start_session(user_id).await?;

        info!(user_id = %user_id, "Tokens refreshed successfully");
        Ok(TokenResponse::from(tokens))
    }

    /// Logout by revoking one refresh session, or every session of the
    /// user when no refresh token is given
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(
        &self,
        user_id: Snowflake,
        refresh_token: Option<String>,
    ) -> ServiceResult<()> {
        if let Some(token) = refresh_token {
            let claims = self.ctx.jwt_service().decode_token(&token)?;
            if claims.user_id()? != user_id {
                return Err(AppError::InvalidToken.into());
            }
            if let Some(session_id) = claims.session_id {
                self.ctx.sessions().revoke(&session_id).await?;
            }
        } else {
            let revoked = self.ctx.sessions().revoke_all_for_user(user_id).await?;
            info!(user_id = %user_id, revoked, "All sessions revoked");
        }

        info!(user_id = %user_id, "User logged out successfully");
        Ok(())
    }

    /// The authenticated user's own account
    #[instrument(skip(self))]
    pub async fn me(&self, user_id: Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        Ok(CurrentUserResponse::from(&user))
    }

    /// Resolve an access token to an active user
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let claims = self.ctx.jwt_service().validate_access_token(token)?;
        let user_id = claims.user_id()?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::AccountDeactivated.into());
        }

        Ok(user)
    }

    async fn start_session(&self, user_id: Snowflake) -> ServiceResult<board_common::TokenPair> {
        let session_id = Uuid::new_v4().to_string();
        let tokens = self.ctx.jwt_service().issue(user_id, &session_id)?;
        self.ctx
            .sessions()
            .store(&RefreshSession::new(user_id, session_id))
            .await?;
        Ok(tokens)
    }
}
