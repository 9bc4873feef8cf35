//! # board-cache
//!
//! Redis layer holding refresh-token sessions.
//!
//! ## Example
//!
//! ```ignore
//! use board_cache::{RedisPool, RedisPoolConfig, RefreshSession, RefreshTokenStore};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let store = RefreshTokenStore::new(pool, 7 * 24 * 60 * 60);
//!
//! store.store(&RefreshSession::new(user_id, session_id)).await?;
//! let rotated = store.consume(&session_id).await?;
//! ```

pub mod pool;
pub mod session;

pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use session::{RefreshSession, RefreshTokenStore};
