//! Process-wide table resolving a video to its hub.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::WebSocketConfig;
use crate::domain::comment::Comment;
use crate::domain::foundation::VideoId;
use crate::ports::LiveCommentPublisher;

use super::hub::TopicHub;
use super::messages::CommentEvent;

/// Maps each video to its hub, creating hubs on first reference.
///
/// The table is append-only: hubs are never retired, an accepted
/// trade-off given one hub per actively-viewed video. Resolution takes
/// the write lock around the whole check-then-create, so concurrent
/// first-time resolutions of the same video yield exactly one hub.
pub struct HubRegistry {
    hubs: RwLock<HashMap<VideoId, TopicHub>>,
    config: WebSocketConfig,
}

impl HubRegistry {
    /// Create an empty registry.
    pub fn new(config: WebSocketConfig) -> Self {
        Self {
            hubs: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Resolve the hub for a video, creating and starting it on first
    /// reference. Idempotent: repeated calls return handles to the same
    /// hub instance.
    pub async fn resolve(&self, video_id: &VideoId) -> TopicHub {
        // Fast path: the hub already exists for almost every call.
        if let Some(hub) = self.hubs.read().await.get(video_id) {
            return hub.clone();
        }

        let mut hubs = self.hubs.write().await;
        hubs.entry(video_id.clone())
            .or_insert_with(|| TopicHub::spawn(video_id.clone(), self.config.broadcast_capacity))
            .clone()
    }

    /// Outbound buffer size for new viewer sessions.
    pub fn session_buffer(&self) -> usize {
        self.config.session_buffer
    }

    /// Number of hubs currently alive (for logging/inspection).
    pub async fn hub_count(&self) -> usize {
        self.hubs.read().await.len()
    }
}

#[async_trait]
impl LiveCommentPublisher for HubRegistry {
    async fn publish(&self, comment: Comment) {
        let hub = self.resolve(&comment.video_id).await;
        hub.broadcast(CommentEvent::from(comment));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::comment::CommentAuthor;
    use crate::domain::foundation::{CommentId, Timestamp, UserId};
    use crate::adapters::websocket::session::{ViewerHandle, ViewerId};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn registry() -> Arc<HubRegistry> {
        Arc::new(HubRegistry::new(WebSocketConfig::default()))
    }

    fn video(id: &str) -> VideoId {
        VideoId::new(id).unwrap()
    }

    fn comment_on(video_id: &str, message: &str) -> Comment {
        Comment {
            id: CommentId::new(1),
            video_id: video(video_id),
            message: message.to_string(),
            created_at: Timestamp::now(),
            author: CommentAuthor {
                id: UserId::new("u1").unwrap(),
                username: "alice".to_string(),
                avatar_url: None,
            },
        }
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let registry = registry();
        let first = registry.resolve(&video("v1")).await;
        let second = registry.resolve(&video("v1")).await;

        assert!(first.same_hub(&second));
        assert_eq!(registry.hub_count().await, 1);
    }

    #[tokio::test]
    async fn resolve_partitions_by_video() {
        let registry = registry();
        let v1 = registry.resolve(&video("v1")).await;
        let v2 = registry.resolve(&video("v2")).await;

        assert!(!v1.same_hub(&v2));
        assert_eq!(registry.hub_count().await, 2);
    }

    #[tokio::test]
    async fn concurrent_first_resolution_creates_one_hub() {
        let registry = registry();

        let mut tasks = Vec::new();
        for _ in 0..32 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry.resolve(&video("fresh")).await
            }));
        }

        let mut hubs = Vec::new();
        for task in tasks {
            hubs.push(task.await.unwrap());
        }

        let first = &hubs[0];
        assert!(hubs.iter().all(|hub| hub.same_hub(first)));
        assert_eq!(registry.hub_count().await, 1);
    }

    #[tokio::test]
    async fn publish_reaches_registered_viewer() {
        let registry = registry();
        let hub = registry.resolve(&video("v1")).await;

        let (tx, mut rx) = mpsc::channel(8);
        hub.register(ViewerHandle::new(ViewerId::new(), tx)).await;

        registry.publish(comment_on("v1", "live!")).await;

        let payload = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out")
            .expect("channel closed");
        assert!(payload.contains(r#""Message":"live!""#));
    }

    #[tokio::test]
    async fn publish_to_video_without_viewers_is_silent() {
        let registry = registry();
        // Must neither error nor panic; it also creates the hub.
        registry.publish(comment_on("lonely", "anyone?")).await;
        assert_eq!(registry.hub_count().await, 1);
    }

    #[tokio::test]
    async fn publish_is_isolated_per_video() {
        let registry = registry();
        let v3 = registry.resolve(&video("v3")).await;
        let v4 = registry.resolve(&video("v4")).await;

        let (tx3, mut rx3) = mpsc::channel(8);
        let (tx4, mut rx4) = mpsc::channel(8);
        v3.register(ViewerHandle::new(ViewerId::new(), tx3)).await;
        v4.register(ViewerHandle::new(ViewerId::new(), tx4)).await;

        registry.publish(comment_on("v3", "only for v3")).await;

        let payload = timeout(Duration::from_secs(1), rx3.recv())
            .await
            .expect("timed out")
            .expect("channel closed");
        assert!(payload.contains("only for v3"));

        let stray = timeout(Duration::from_millis(100), rx4.recv()).await;
        assert!(stray.is_err(), "v4 viewer must not observe v3 traffic");
    }
}
