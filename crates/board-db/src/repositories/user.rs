//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use board_core::entities::{NewUser, User, UserUpdate};
use board_core::error::DomainError;
use board_core::traits::{RepoResult, UserRepository};
use board_core::value_objects::Snowflake;

use crate::mappers::UserInsert;
use crate::models::UserModel;

use super::error::{map_constraint_violation, map_db_error, user_not_found};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, is_active, created_at, updated_at";

/// Unique constraints on `users` and the domain error each one means
fn user_constraint(constraint: &str) -> Option<DomainError> {
    match constraint {
        "users_email_key" => Some(DomainError::EmailAlreadyExists),
        "users_username_key" => Some(DomainError::UsernameAlreadyExists),
        _ => None,
    }
}

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {column} = $1"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_one("email", &User::normalize_email(email)).await
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        self.find_one("username", username.trim()).await
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(User::normalize_email(email))
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username.trim())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &NewUser) -> RepoResult<User> {
        let insert = UserInsert::new(user);

        let model = sqlx::query_as::<_, UserModel>(&format!(
            r"
            INSERT INTO users (id, username, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(insert.id)
        .bind(insert.username)
        .bind(&insert.email)
        .bind(insert.password_hash)
        .bind(insert.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, user_constraint))?;

        Ok(User::from(model))
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, id: Snowflake, update: &UserUpdate) -> RepoResult<User> {
        let model = sqlx::query_as::<_, UserModel>(&format!(
            r"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(id.into_inner())
        .bind(update.username.as_deref().map(str::trim))
        .bind(update.email.as_deref().map(User::normalize_email))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, user_constraint))?;

        model.map(User::from).ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(self))]
    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()> {
        let result =
            sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.into_inner())
                .bind(active)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Take the user's reactions back out of the counters they contributed to
        let adjusted = sqlx::query(
            r"
            UPDATE comments c
            SET likes_count = c.likes_count - r.likes,
                dislikes_count = c.dislikes_count - r.dislikes
            FROM (
                SELECT comment_id,
                       (COUNT(*) FILTER (WHERE kind = 'like'))::INT AS likes,
                       (COUNT(*) FILTER (WHERE kind = 'dislike'))::INT AS dislikes
                FROM comment_reactions
                WHERE user_id = $1
                GROUP BY comment_id
            ) r
            WHERE c.id = r.comment_id
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        sqlx::query("DELETE FROM comment_reactions WHERE user_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        // Own comments, their replies and reactions go with the user via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        tx.commit().await.map_err(map_db_error)?;

        info!(user_id = %id, adjusted_comments = adjusted, "User deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
