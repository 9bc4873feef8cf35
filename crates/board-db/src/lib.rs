//! # board-db
//!
//! Database layer implementing the board-core repository traits with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations, including the transactional reaction toggle
//!
//! ## Usage
//!
//! ```rust,ignore
//! use board_db::pool::{create_pool, DatabaseConfig};
//! use board_db::repositories::PgCommentRepository;
//! use board_core::traits::{CommentQuery, CommentRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_env()).await?;
//!     let comments = PgCommentRepository::new(pool);
//!     let page = comments.list(&CommentQuery::default()).await?;
//!     println!("{} comments", page.total);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{
    create_pool, create_pool_from_env, default_migrations_dir, run_migrations, DatabaseConfig,
    PgPool,
};
pub use repositories::{PgCommentRepository, PgReactionRepository, PgUserRepository};
