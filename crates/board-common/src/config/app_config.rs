//! Application configuration structs
//!
//! Loaded from environment variables (and a `.env` file when present).

use board_core::traits::CommentQuery;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub comments: CommentsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Login/register attempts allowed per minute
    #[serde(default = "default_auth_per_minute")]
    pub auth_per_minute: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Comment listing limits
#[derive(Debug, Clone, Deserialize)]
pub struct CommentsConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "comment-board".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_acquire_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_redis_pool_size() -> usize {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    604_800 // 7 days
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_auth_per_minute() -> u32 {
    5
}

fn default_client_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

const DEV_JWT_SECRET: &str = "development-only-secret-change-me";

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value fails to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let app_env: Environment = vars.parse_or("APP_ENV", Environment::default)?;

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ if app_env.is_production() => return Err(ConfigError::MissingVar("JWT_SECRET")),
            _ => DEV_JWT_SECRET.to_string(),
        };

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .or_else(|| lookup("CLIENT_URL"))
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_else(|| vec![default_client_url()]);

        let snowflake = SnowflakeConfig {
            worker_id: vars.parse_or("SNOWFLAKE_WORKER_ID", || 0)?,
        };
        if snowflake.worker_id >= 1024 {
            return Err(ConfigError::InvalidValue(
                "SNOWFLAKE_WORKER_ID",
                "must be below 1024".to_string(),
            ));
        }

        let comments = CommentsConfig {
            default_page_size: vars.parse_or("COMMENTS_DEFAULT_PAGE_SIZE", default_page_size)?,
            max_page_size: vars.parse_or("COMMENTS_MAX_PAGE_SIZE", default_max_page_size)?,
        };
        if comments.max_page_size == 0 || comments.max_page_size > CommentQuery::MAX_LIMIT {
            return Err(ConfigError::InvalidValue(
                "COMMENTS_MAX_PAGE_SIZE",
                format!("must be between 1 and {}", CommentQuery::MAX_LIMIT),
            ));
        }
        if comments.default_page_size == 0 || comments.default_page_size > comments.max_page_size
        {
            return Err(ConfigError::InvalidValue(
                "COMMENTS_DEFAULT_PAGE_SIZE",
                "must be between 1 and COMMENTS_MAX_PAGE_SIZE".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: app_env,
            },
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(default_host),
                port: vars.parse_or("SERVER_PORT", default_port)?,
                request_timeout_secs: vars
                    .parse_or("REQUEST_TIMEOUT_SECS", default_request_timeout_secs)?,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: vars
                    .parse_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars
                    .parse_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                acquire_timeout_secs: vars
                    .parse_or("DATABASE_ACQUIRE_TIMEOUT_SECS", default_acquire_timeout_secs)?,
                run_migrations: vars.parse_or("DATABASE_RUN_MIGRATIONS", default_true)?,
            },
            redis: RedisConfig {
                url: lookup("REDIS_URL").unwrap_or_else(default_redis_url),
                pool_size: vars.parse_or("REDIS_POOL_SIZE", default_redis_pool_size)?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_expiry: vars
                    .parse_or("JWT_ACCESS_TOKEN_EXPIRY_SECS", default_access_token_expiry)?,
                refresh_token_expiry: vars
                    .parse_or("JWT_REFRESH_TOKEN_EXPIRY_SECS", default_refresh_token_expiry)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse_or("RATE_LIMIT_PER_SECOND", default_requests_per_second)?,
                burst: vars.parse_or("RATE_LIMIT_BURST", default_burst)?,
                auth_per_minute: vars
                    .parse_or("AUTH_RATE_LIMIT_PER_MINUTE", default_auth_per_minute)?,
            },
            cors: CorsConfig { allowed_origins },
            snowflake,
            comments,
        })
    }
}

struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Parse `key` if set, otherwise use the default. Set-but-invalid is an error.
    fn parse_or<T, D>(&self, key: &'static str, default: D) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
        D: FnOnce() -> T,
    {
        match (self.0)(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue(key, e.to_string())),
            None => Ok(default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
