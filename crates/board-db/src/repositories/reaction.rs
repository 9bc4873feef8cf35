//! PostgreSQL implementation of ReactionRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use board_core::entities::{Comment, Reaction, ReactionTransition};
use board_core::error::DomainError;
use board_core::traits::{ReactionRepository, RepoResult, ToggleOutcome};
use board_core::value_objects::{ReactionKind, Snowflake};

use crate::models::{CommentModel, DbReactionKind, ReactionModel};

use super::error::{comment_not_found, map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn write_transition(
        tx: &mut Transaction<'_, Postgres>,
        new_id: Snowflake,
        user_id: Snowflake,
        comment_id: Snowflake,
        transition: ReactionTransition,
    ) -> RepoResult<()> {
        match transition {
            ReactionTransition::Create(kind) => {
                sqlx::query(
                    r"
                    INSERT INTO comment_reactions (id, user_id, comment_id, kind)
                    VALUES ($1, $2, $3, $4)
                    ",
                )
                .bind(new_id.into_inner())
                .bind(user_id.into_inner())
                .bind(comment_id.into_inner())
                .bind(DbReactionKind::from(kind))
                .execute(&mut **tx)
                .await
                .map_err(|e| map_unique_violation(e, || DomainError::ReactionConflict))?;
            }
            ReactionTransition::Remove(_) => {
                sqlx::query("DELETE FROM comment_reactions WHERE user_id = $1 AND comment_id = $2")
                    .bind(user_id.into_inner())
                    .bind(comment_id.into_inner())
                    .execute(&mut **tx)
                    .await
                    .map_err(map_db_error)?;
            }
            ReactionTransition::Switch { to, .. } => {
                sqlx::query(
                    r"
                    UPDATE comment_reactions
                    SET kind = $3
                    WHERE user_id = $1 AND comment_id = $2
                    ",
                )
                .bind(user_id.into_inner())
                .bind(comment_id.into_inner())
                .bind(DbReactionKind::from(to))
                .execute(&mut **tx)
                .await
                .map_err(map_db_error)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        user_id: Snowflake,
        comment_id: Snowflake,
    ) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT id, user_id, comment_id, kind, created_at
            FROM comment_reactions
            WHERE user_id = $1 AND comment_id = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(comment_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Reaction::from))
    }

    #[instrument(skip(self, comment_ids), fields(count = comment_ids.len()))]
    async fn find_kinds_for_comments(
        &self,
        user_id: Snowflake,
        comment_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, ReactionKind>> {
        if comment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i64> = comment_ids.iter().map(|id| id.into_inner()).collect();
        let rows = sqlx::query_as::<_, (i64, DbReactionKind)>(
            r"
            SELECT comment_id, kind
            FROM comment_reactions
            WHERE user_id = $1 AND comment_id = ANY($2)
            ",
        )
        .bind(user_id.into_inner())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|(comment_id, kind)| (Snowflake::new(comment_id), kind.into()))
            .collect())
    }

    #[instrument(skip(self, new_id))]
    async fn toggle(
        &self,
        new_id: Snowflake,
        user_id: Snowflake,
        comment_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<ToggleOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock serializes toggles on the same comment
        let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM comments WHERE id = $1 FOR UPDATE")
            .bind(comment_id.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if locked.is_none() {
            return Err(comment_not_found(comment_id));
        }

        let current = sqlx::query_scalar::<_, DbReactionKind>(
            "SELECT kind FROM comment_reactions WHERE user_id = $1 AND comment_id = $2",
        )
        .bind(user_id.into_inner())
        .bind(comment_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let transition = ReactionTransition::decide(current.map(ReactionKind::from), kind);
        Self::write_transition(&mut tx, new_id, user_id, comment_id, transition).await?;

        let delta = transition.deltas();
        let model = sqlx::query_as::<_, CommentModel>(
            r"
            UPDATE comments
            SET likes_count = likes_count + $2, dislikes_count = dislikes_count + $3
            WHERE id = $1
            RETURNING id, author_id, parent_id, content, likes_count, dislikes_count,
                      is_edited, created_at, updated_at
            ",
        )
        .bind(comment_id.into_inner())
        .bind(delta.likes)
        .bind(delta.dislikes)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        debug!(?transition, "Reaction toggled");

        Ok(ToggleOutcome {
            transition,
            comment: Comment::from(model),
        })
    }

    #[instrument(skip(self))]
    async fn count_by_kind(&self, comment_id: Snowflake) -> RepoResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT COUNT(*) FILTER (WHERE kind = 'like'),
                   COUNT(*) FILTER (WHERE kind = 'dislike')
            FROM comment_reactions
            WHERE comment_id = $1
            ",
        )
        .bind(comment_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
