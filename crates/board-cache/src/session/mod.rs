//! Refresh-token session storage

mod refresh_token;

pub use refresh_token::{RefreshSession, RefreshTokenStore};
