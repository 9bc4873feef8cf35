//! Route definitions
//!
//! All API routes mounted under /api/v1. Health probes are kept apart so
//! they bypass rate limiting.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use board_common::{AppError, RateLimitConfig};

use crate::handlers::{auth, comments, health, users};
use crate::middleware::with_auth_rate_limit;
use crate::state::AppState;

/// Create the API router (without health routes)
pub fn create_router(rate_limit: &RateLimitConfig) -> Result<Router<AppState>, AppError> {
    Ok(Router::new().nest("/api/v1", api_v1_routes(rate_limit)?))
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes(rate_limit: &RateLimitConfig) -> Result<Router<AppState>, AppError> {
    Ok(Router::new()
        .merge(auth_routes(rate_limit)?)
        .merge(user_routes())
        .merge(comment_routes()))
}

/// Authentication routes; login and register get a stricter limiter
fn auth_routes(rate_limit: &RateLimitConfig) -> Result<Router<AppState>, AppError> {
    let credentials = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    Ok(with_auth_rate_limit(credentials, rate_limit)?
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me)))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/users/deactivate", put(users::deactivate))
        .route("/users/account", delete(users::delete_account))
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/comments/:id",
            get(comments::get_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/comments/:id/like", post(comments::like_comment))
        .route("/comments/:id/dislike", post(comments::dislike_comment))
}
