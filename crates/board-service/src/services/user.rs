//! User service
//!
//! The caller's own account: profile, deactivation and deletion.

use board_core::entities::{User, UserUpdate};
use board_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CurrentUserResponse, UpdateProfileRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self.find(user_id).await?;
        Ok(CurrentUserResponse::from(&user))
    }

    /// Change username and/or email. Values equal to the current ones are
    /// accepted; values owned by another account conflict.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Snowflake,
        request: UpdateProfileRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let update = UserUpdate {
            username: request.username.map(|u| u.trim().to_string()),
            email: request.email.map(|e| User::normalize_email(&e)),
        };
        if update.is_empty() {
            return Err(ServiceError::validation(
                "At least one of username or email is required",
            ));
        }

        if let Some(username) = &update.username {
            if let Some(owner) = self.ctx.user_repo().find_by_username(username).await? {
                if owner.id != user_id {
                    return Err(DomainError::UsernameAlreadyExists.into());
                }
            }
        }
        if let Some(email) = &update.email {
            if let Some(owner) = self.ctx.user_repo().find_by_email(email).await? {
                if owner.id != user_id {
                    return Err(DomainError::EmailAlreadyExists.into());
                }
            }
        }

        let user = self.ctx.user_repo().update_profile(user_id, &update).await?;

        info!(user_id = %user_id, "Profile updated");
        Ok(CurrentUserResponse::from(&user))
    }

    /// Deactivate the account and revoke every refresh session
    #[instrument(skip(self))]
    pub async fn deactivate(&self, user_id: Snowflake) -> ServiceResult<()> {
        let user = self.find(user_id).await?;
        if !user.is_active {
            return Err(DomainError::AlreadyDeactivated.into());
        }

        self.ctx.user_repo().set_active(user_id, false).await?;
        let revoked = self.ctx.sessions().revoke_all_for_user(user_id).await?;

        info!(user_id = %user_id, revoked, "Account deactivated");
        Ok(())
    }

    /// Delete the account with its comments and reactions
    #[instrument(skip(self))]
    pub async fn delete_account(&self, user_id: Snowflake) -> ServiceResult<()> {
        self.find(user_id).await?;

        self.ctx.sessions().revoke_all_for_user(user_id).await?;
        self.ctx.user_repo().delete(user_id).await?;

        info!(user_id = %user_id, "Account deleted");
        Ok(())
    }

    async fn find(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }
}
