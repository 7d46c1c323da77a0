//! Live fan-out publish port.

use async_trait::async_trait;

use crate::domain::comment::Comment;

/// Entry point by which a newly persisted comment reaches live viewers.
///
/// Fire and forget: the call resolves (or creates) the hub for the
/// comment's video and enqueues the event for broadcast. It never blocks
/// on delivery and surfaces no error - fan-out is best effort and must
/// not affect the REST response to the comment author.
#[async_trait]
pub trait LiveCommentPublisher: Send + Sync {
    /// Enqueue a persisted comment for broadcast to the video's viewers.
    async fn publish(&self, comment: Comment);
}
