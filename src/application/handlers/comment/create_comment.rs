//! CreateCommentHandler - command handler for posting a comment.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::comment::{Comment, CommentDraft};
use crate::domain::foundation::{UserId, ValidationError, VideoId};
use crate::ports::{CommentRepository, CommentRepositoryError, LiveCommentPublisher};

/// Command to post a comment on a video.
#[derive(Debug, Clone)]
pub struct CreateCommentCommand {
    pub user_id: UserId,
    pub video_id: VideoId,
    pub message: String,
}

/// Errors surfaced by comment creation.
#[derive(Debug, Error)]
pub enum CreateCommentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] CommentRepositoryError),
}

/// Handler for posting comments.
///
/// Persists first, then publishes the stored comment to live viewers.
/// Publication is fire-and-forget: the REST caller's success depends
/// only on persistence.
pub struct CreateCommentHandler {
    repository: Arc<dyn CommentRepository>,
    publisher: Arc<dyn LiveCommentPublisher>,
}

impl CreateCommentHandler {
    pub fn new(
        repository: Arc<dyn CommentRepository>,
        publisher: Arc<dyn LiveCommentPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    pub async fn handle(&self, cmd: CreateCommentCommand) -> Result<Comment, CreateCommentError> {
        // 1. Validate the draft
        let draft = CommentDraft::new(cmd.user_id, cmd.video_id, cmd.message)?;

        // 2. Persist; the store assigns id and created_at
        let comment = self.repository.create(&draft).await?;

        tracing::info!(
            comment_id = %comment.id,
            video = %comment.video_id,
            "comment created"
        );

        // 3. Fan out the stored row to live viewers
        self.publisher.publish(comment.clone()).await;

        Ok(comment)
    }
}
