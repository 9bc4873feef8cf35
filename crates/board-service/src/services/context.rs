//! Service context - dependency container for services
//!
//! Holds the repositories, the refresh session store and the stateless
//! helpers (JWT, password hashing, id generation) every service borrows.

use std::sync::Arc;

use board_common::auth::{JwtService, PasswordService};
use board_common::CommentsConfig;
use board_core::traits::{CommentRepository, ReactionRepository, UserRepository};
use board_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};
use super::session::SessionStore;

/// Service context containing all dependencies
///
/// Cheap to clone; everything inside is shared.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,

    // Sessions
    sessions: Arc<dyn SessionStore>,

    // Helpers
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
    snowflake_generator: Arc<SnowflakeGenerator>,

    comments: CommentsConfig,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    // === Sessions ===

    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    // === Helpers ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    /// Listing limits from configuration
    pub fn comments_config(&self) -> &CommentsConfig {
        &self.comments
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("comments", &self.comments)
            .finish()
    }
}

/// Builder for ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    sessions: Option<Arc<dyn SessionStore>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    comments: Option<CommentsConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn sessions(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn comments_config(mut self, config: CommentsConfig) -> Self {
        self.comments = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` naming the first missing dependency
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            reaction_repo: required(self.reaction_repo, "reaction_repo")?,
            sessions: required(self.sessions, "sessions")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            password_service: PasswordService::new(),
            snowflake_generator: self.snowflake_generator.unwrap_or_default(),
            comments: self.comments.unwrap_or_default(),
        })
    }
}
