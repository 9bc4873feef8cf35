//! Refresh-token sessions in Redis.
//!
//! Each issued refresh token carries a session id. The session record lives
//! under `refresh_token:{session_id}` with the refresh-token TTL, and the
//! `user_tokens:{user_id}` set tracks a user's sessions for revoke-all.
//! Rotation consumes the old session atomically, so a refresh token can be
//! exchanged at most once.

use board_core::Snowflake;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisResult};

const SESSION_PREFIX: &str = "refresh_token:";
const USER_SESSIONS_PREFIX: &str = "user_tokens:";

/// What is remembered about a live refresh session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    pub user_id: Snowflake,
    pub session_id: String,
    /// Unix epoch seconds
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl RefreshSession {
    #[must_use]
    pub fn new(user_id: Snowflake, session_id: impl Into<String>) -> Self {
        Self {
            user_id,
            session_id: session_id.into(),
            created_at: chrono::Utc::now().timestamp(),
            user_agent: None,
        }
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Redis-backed store of refresh sessions
#[derive(Clone)]
pub struct RefreshTokenStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RefreshTokenStore {
    /// `ttl_seconds` should match the refresh token lifetime
    #[must_use]
    pub fn new(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn session_key(session_id: &str) -> String {
        format!("{SESSION_PREFIX}{session_id}")
    }

    fn user_sessions_key(user_id: Snowflake) -> String {
        format!("{USER_SESSIONS_PREFIX}{user_id}")
    }

    /// Record a newly issued session
    pub async fn store(&self, session: &RefreshSession) -> RedisResult<()> {
        let payload = serde_json::to_string(session)?;
        let user_key = Self::user_sessions_key(session.user_id);
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);

        let mut conn = self.pool.get().await?;
        redis::pipe()
            .atomic()
            .set_ex(Self::session_key(&session.session_id), payload, self.ttl_seconds)
            .ignore()
            .sadd(&user_key, &session.session_id)
            .ignore()
            .expire(&user_key, ttl)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        tracing::debug!(
            user_id = %session.user_id,
            session_id = %session.session_id,
            "Stored refresh session"
        );

        Ok(())
    }

    /// Look up a live session without consuming it
    pub async fn validate(&self, session_id: &str) -> RedisResult<Option<RefreshSession>> {
        self.pool.get_json(&Self::session_key(session_id)).await
    }

    /// Remove a session and return it. Of two concurrent callers only one
    /// gets `Some`.
    pub async fn consume(&self, session_id: &str) -> RedisResult<Option<RefreshSession>> {
        let session: Option<RefreshSession> =
            self.pool.take_json(&Self::session_key(session_id)).await?;

        if let Some(session) = &session {
            let mut conn = self.pool.get().await?;
            conn.srem::<_, _, ()>(Self::user_sessions_key(session.user_id), session_id)
                .await?;
        }

        Ok(session)
    }

    /// Revoke one session; `false` if it was already gone
    pub async fn revoke(&self, session_id: &str) -> RedisResult<bool> {
        let revoked = self.consume(session_id).await?.is_some();
        if revoked {
            tracing::debug!(session_id = %session_id, "Revoked refresh session");
        }
        Ok(revoked)
    }

    /// Revoke every session of a user (logout everywhere)
    pub async fn revoke_all_for_user(&self, user_id: Snowflake) -> RedisResult<usize> {
        let user_key = Self::user_sessions_key(user_id);
        let mut conn = self.pool.get().await?;

        let session_ids: Vec<String> = conn.smembers(&user_key).await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for session_id in &session_ids {
            pipe.del(Self::session_key(session_id)).ignore();
        }
        pipe.del(&user_key).ignore();
        pipe.query_async::<()>(&mut conn).await?;

        tracing::info!(
            user_id = %user_id,
            count = session_ids.len(),
            "Revoked all refresh sessions for user"
        );

        Ok(session_ids.len())
    }
}
