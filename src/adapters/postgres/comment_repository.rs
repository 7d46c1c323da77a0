//! PostgreSQL implementation of CommentRepository.
//!
//! Comments live in the `comments` table, keyed by a bigserial id, with
//! `created_at` defaulted by the database. The author row is joined on
//! load so every returned comment carries its author snapshot.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::comment::{Comment, CommentAuthor, CommentDraft};
use crate::domain::foundation::{CommentId, Timestamp, UserId, VideoId};
use crate::ports::{CommentRepository, CommentRepositoryError as RepositoryError};

/// PostgreSQL implementation of CommentRepository.
#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    /// Creates a new PostgresCommentRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_comment(row: &sqlx::postgres::PgRow) -> Result<Comment, RepositoryError> {
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| RepositoryError::Database(format!("Failed to read user_id: {}", e)))?;
    let video_id: String = row
        .try_get("video_id")
        .map_err(|e| RepositoryError::Database(format!("Failed to read video_id: {}", e)))?;

    Ok(Comment {
        id: CommentId::new(
            row.try_get("id")
                .map_err(|e| RepositoryError::Database(format!("Failed to read id: {}", e)))?,
        ),
        video_id: VideoId::new(video_id)
            .map_err(|e| RepositoryError::Database(format!("Invalid video_id in row: {}", e)))?,
        message: row
            .try_get("message")
            .map_err(|e| RepositoryError::Database(format!("Failed to read message: {}", e)))?,
        created_at: Timestamp::from_datetime(row.try_get("created_at").map_err(|e| {
            RepositoryError::Database(format!("Failed to read created_at: {}", e))
        })?),
        author: CommentAuthor {
            id: UserId::new(user_id)
                .map_err(|e| RepositoryError::Database(format!("Invalid user_id in row: {}", e)))?,
            username: row.try_get("username").map_err(|e| {
                RepositoryError::Database(format!("Failed to read username: {}", e))
            })?,
            avatar_url: row.try_get("avatar_url").map_err(|e| {
                RepositoryError::Database(format!("Failed to read avatar_url: {}", e))
            })?,
        },
    })
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, draft: &CommentDraft) -> Result<Comment, RepositoryError> {
        // The insert and the author join run in one statement so the
        // returned comment is exactly what any later read would see.
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO comments (user_id, video_id, message)
                VALUES ($1, $2, $3)
                RETURNING id, user_id, video_id, message, created_at
            )
            SELECT inserted.id, inserted.user_id, inserted.video_id,
                   inserted.message, inserted.created_at,
                   users.username, users.avatar_url
            FROM inserted
            JOIN users ON users.id = inserted.user_id
            "#,
        )
        .bind(draft.user_id().as_str())
        .bind(draft.video_id().as_str())
        .bind(draft.message())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                RepositoryError::AuthorNotFound(draft.user_id().as_str().to_string())
            } else {
                RepositoryError::Database(format!("Failed to insert comment: {}", e))
            }
        })?;

        // A missing row means the insert succeeded but the author join
        // matched nothing, which only happens without the FK constraint.
        let row = row.ok_or_else(|| {
            RepositoryError::AuthorNotFound(draft.user_id().as_str().to_string())
        })?;

        row_to_comment(&row)
    }

    async fn list_for_video(&self, video_id: &VideoId) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT comments.id, comments.user_id, comments.video_id,
                   comments.message, comments.created_at,
                   users.username, users.avatar_url
            FROM comments
            JOIN users ON users.id = comments.user_id
            WHERE comments.video_id = $1
            ORDER BY comments.created_at ASC, comments.id ASC
            "#,
        )
        .bind(video_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to fetch comments: {}", e)))?;

        rows.iter().map(row_to_comment).collect()
    }
}

/// Whether a sqlx error is a foreign key violation (SQLSTATE 23503).
fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23503")
    )
}
