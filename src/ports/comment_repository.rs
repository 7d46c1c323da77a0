//! Comment persistence port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::comment::{Comment, CommentDraft};
use crate::domain::foundation::VideoId;

/// Errors surfaced by comment store implementations.
#[derive(Debug, Error)]
pub enum CommentRepositoryError {
    /// The draft references a user the store does not know.
    #[error("Author not found: {0}")]
    AuthorNotFound(String),

    /// Any other storage failure.
    #[error("Database error: {0}")]
    Database(String),
}

/// Durable storage of comment rows.
///
/// `create` persists the draft and returns the fully hydrated comment -
/// store-assigned id and timestamp, author row joined - which is the
/// canonical value both returned to the REST caller and handed to the
/// live fan-out.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a validated draft, returning the hydrated comment.
    async fn create(&self, draft: &CommentDraft) -> Result<Comment, CommentRepositoryError>;

    /// All comments for a video, ascending by creation time.
    async fn list_for_video(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn CommentRepository>();
    }

    #[test]
    fn errors_display_context() {
        let err = CommentRepositoryError::AuthorNotFound("u1".to_string());
        assert_eq!(format!("{}", err), "Author not found: u1");

        let err = CommentRepositoryError::Database("connection reset".to_string());
        assert!(format!("{}", err).contains("connection reset"));
    }
}
