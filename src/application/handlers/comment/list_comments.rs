//! ListCommentsHandler - query handler for a video's comment history.

use std::sync::Arc;

use crate::domain::comment::Comment;
use crate::domain::foundation::VideoId;
use crate::ports::{CommentRepository, CommentRepositoryError};

/// Handler returning a video's comments, oldest first.
pub struct ListCommentsHandler {
    repository: Arc<dyn CommentRepository>,
}

impl ListCommentsHandler {
    pub fn new(repository: Arc<dyn CommentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        self.repository.list_for_video(video_id).await
    }
}
