//! Refresh session storage seen from the service layer

use async_trait::async_trait;
use board_cache::{RefreshSession, RefreshTokenStore};
use board_core::Snowflake;

use super::error::ServiceResult;

/// Where refresh sessions live. Implemented by the Redis store; services
/// depend only on this trait.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn store(&self, session: &RefreshSession) -> ServiceResult<()>;

    /// Remove and return a session; `None` if unknown, expired or already used
    async fn consume(&self, session_id: &str) -> ServiceResult<Option<RefreshSession>>;

    async fn revoke(&self, session_id: &str) -> ServiceResult<bool>;

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> ServiceResult<usize>;
}

#[async_trait]
impl SessionStore for RefreshTokenStore {
    async fn store(&self, session: &RefreshSession) -> ServiceResult<()> {
        Ok(RefreshTokenStore::store(self, session).await?)
    }

    async fn consume(&self, session_id: &str) -> ServiceResult<Option<RefreshSession>> {
        Ok(RefreshTokenStore::consume(self, session_id).await?)
    }

    async fn revoke(&self, session_id: &str) -> ServiceResult<bool> {
        Ok(RefreshTokenStore::revoke(self, session_id).await?)
    }

    async fn revoke_all_for_user(&self, user_id: Snowflake) -> ServiceResult<usize> {
        Ok(RefreshTokenStore::revoke_all_for_user(self, user_id).await?)
    }
}
