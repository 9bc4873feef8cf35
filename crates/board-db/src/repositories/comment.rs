//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use board_core::entities::{Comment, CommentView, NewComment};
use board_core::error::DomainError;
use board_core::traits::{
    CommentListing, CommentQuery, CommentRepository, CommentSort, ParentFilter, RepoResult,
};
use board_core::value_objects::{CommentContent, Snowflake};

use crate::mappers::CommentInsert;
use crate::models::{CommentModel, CommentViewModel};

use super::error::{comment_not_found, map_constraint_violation, map_db_error};

const COMMENT_COLUMNS: &str = "id, author_id, parent_id, content, likes_count, dislikes_count, \
                               is_edited, created_at, updated_at";

const VIEW_SELECT: &str = r"
    SELECT c.id, c.author_id, c.parent_id, c.content, c.likes_count, c.dislikes_count,
           c.is_edited, c.created_at, c.updated_at,
           u.username AS author_username,
           (SELECT COUNT(*) FROM comments r WHERE r.parent_id = c.id) AS replies_count
    FROM comments c
    JOIN users u ON u.id = c.author_id
";

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_parent_filter(qb: &mut QueryBuilder<'_, Postgres>, parent: ParentFilter) {
    match parent {
        ParentFilter::Any => {}
        ParentFilter::TopLevel => {
            qb.push(" WHERE c.parent_id IS NULL");
        }
        ParentFilter::RepliesTo(id) => {
            qb.push(" WHERE c.parent_id = ").push_bind(id.into_inner());
        }
    }
}

/// ORDER BY clause; the trailing id keeps page boundaries stable
fn order_by(sort: CommentSort) -> &'static str {
    match sort {
        CommentSort::Newest => " ORDER BY c.created_at DESC, c.id DESC",
        CommentSort::Oldest => " ORDER BY c.created_at ASC, c.id ASC",
        CommentSort::MostLiked => " ORDER BY c.likes_count DESC, c.created_at DESC, c.id DESC",
        CommentSort::MostDisliked => {
            " ORDER BY c.dislikes_count DESC, c.created_at DESC, c.id DESC"
        }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn find_view(&self, id: Snowflake) -> RepoResult<Option<CommentView>> {
        let result = sqlx::query_as::<_, CommentViewModel>(&format!("{VIEW_SELECT} WHERE c.id = $1"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(CommentView::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &CommentQuery) -> RepoResult<CommentListing> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM comments c");
        push_parent_filter(&mut count_qb, query.parent);
        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        if total == 0 || query.offset() >= total {
            return Ok(CommentListing {
                items: Vec::new(),
                total,
            });
        }

        let mut items_qb = QueryBuilder::<Postgres>::new(VIEW_SELECT);
        push_parent_filter(&mut items_qb, query.parent);
        items_qb.push(order_by(query.sort));
        items_qb
            .push(" LIMIT ")
            .push_bind(i64::from(query.limit()))
            .push(" OFFSET ")
            .push_bind(query.offset());

        let rows = items_qb
            .build_query_as::<CommentViewModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(CommentListing {
            items: rows.into_iter().map(CommentView::from).collect(),
            total,
        })
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id, author_id = %comment.author_id))]
    async fn create(&self, comment: &NewComment) -> RepoResult<Comment> {
        let insert = CommentInsert::new(comment);

        let model = sqlx::query_as::<_, CommentModel>(&format!(
            r"
            INSERT INTO comments (id, author_id, parent_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMMENT_COLUMNS}
            "
        ))
        .bind(insert.id)
        .bind(insert.author_id)
        .bind(insert.parent_id)
        .bind(insert.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Parent or author removed between the service's check and this insert
            map_constraint_violation(e, |constraint| match constraint {
                "comments_parent_id_fkey" => comment
                    .parent_id
                    .map(DomainError::ParentCommentNotFound),
                "comments_author_id_fkey" => Some(DomainError::UserNotFound(comment.author_id)),
                _ => None,
            })
        })?;

        Ok(Comment::from(model))
    }

    #[instrument(skip(self, content))]
    async fn update_content(
        &self,
        id: Snowflake,
        content: &CommentContent,
    ) -> RepoResult<Comment> {
        let model = sqlx::query_as::<_, CommentModel>(&format!(
            r"
            UPDATE comments
            SET content = $2, is_edited = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "
        ))
        .bind(id.into_inner())
        .bind(content.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model.map(Comment::from).ok_or_else(|| comment_not_found(id))
    }

    #[instrument(skip(self))]
    async fn delete_cascade(&self, id: Snowflake) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            DELETE FROM comment_reactions
            WHERE comment_id = $1
               OR comment_id IN (SELECT id FROM comments WHERE parent_id = $1)
            ",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let replies = sqlx::query("DELETE FROM comments WHERE parent_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(id));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(replies + 1)
    }
}
