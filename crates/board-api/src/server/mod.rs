//! Server setup and initialization
//!
//! Wires pools, repositories and services into an [`AppState`], builds the
//! router and serves it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use board_cache::{RedisPool, RedisPoolConfig, RefreshTokenStore};
use board_common::{AppConfig, AppError, JwtService};
use board_core::SnowflakeGenerator;
use board_db::{
    create_pool, default_migrations_dir, run_migrations, PgCommentRepository,
    PgReactionRepository, PgUserRepository,
};
use board_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, with_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();

    let api = with_rate_limit(create_router(&config.rate_limit)?, &config.rate_limit)?;
    let app = apply_middleware(
        api.merge(health_routes()),
        config.server.request_timeout(),
        &config.cors,
        config.app.env.is_production(),
    );

    Ok(app.with_state(state))
}

/// Connect to PostgreSQL and Redis, run migrations and assemble services
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&board_db::DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, &default_migrations_dir())
            .await
            .map_err(|e| AppError::Database(format!("migration failed: {e}")))?;
    }

    info!("Connecting to Redis...");
    let redis_pool = RedisPool::new(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let sessions = Arc::new(RefreshTokenStore::new(
        redis_pool.clone(),
        config.jwt.refresh_token_expiry.max(1).unsigned_abs(),
    ));

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
        .sessions(sessions)
        .jwt_service(jwt_service)
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .comments_config(config.comments.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool, redis_pool))
}

/// Serve `app` on an already bound listener until the process stops
///
/// Peer addresses are attached to each request for the per-client limiter.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("listener has no address: {e}")))?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.server.address();

    let state = build_state(config).await?;
    let app = create_app(state)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {address}: {e}")))?;

    serve(listener, app).await
}
