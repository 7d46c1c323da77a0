//! Wire types pushed to live viewers.

use serde::Serialize;

use crate::domain::comment::{Comment, CommentAuthor};
use crate::domain::foundation::{CommentId, Timestamp, UserId, VideoId};

/// Immutable snapshot of a persisted comment, broadcast to every viewer
/// of the target video. Field names match the store's REST
/// representation exactly, so the live stream and a fetched comment
/// history are interchangeable on the client.
#[derive(Debug, Clone, Serialize)]
pub struct CommentEvent {
    #[serde(rename = "ID")]
    pub id: CommentId,

    #[serde(rename = "UserID")]
    pub user_id: UserId,

    #[serde(rename = "VideoID")]
    pub video_id: VideoId,

    #[serde(rename = "Message")]
    pub message: String,

    /// The store-persisted creation time, never a handler-local clock.
    #[serde(rename = "CreatedAt")]
    pub created_at: Timestamp,

    #[serde(rename = "User")]
    pub user: CommentAuthor,
}

impl From<Comment> for CommentEvent {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            user_id: comment.author.id.clone(),
            video_id: comment.video_id,
            message: comment.message,
            created_at: comment.created_at,
            user: comment.author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_comment() -> Comment {
        Comment {
            id: CommentId::new(42),
            video_id: VideoId::new("video-7").unwrap(),
            message: "great upload".to_string(),
            created_at: Timestamp::now(),
            author: CommentAuthor {
                id: UserId::new("uid-9").unwrap(),
                username: "carol".to_string(),
                avatar_url: Some("https://cdn.example.com/a.png".to_string()),
            },
        }
    }

    #[test]
    fn event_carries_comment_fields() {
        let event = CommentEvent::from(sample_comment());

        assert_eq!(event.id, CommentId::new(42));
        assert_eq!(event.user_id.as_str(), "uid-9");
        assert_eq!(event.video_id.as_str(), "video-7");
        assert_eq!(event.message, "great upload");
        assert_eq!(event.user.username, "carol");
    }

    #[test]
    fn event_serializes_with_store_field_names() {
        let event = CommentEvent::from(sample_comment());
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains(r#""ID":42"#));
        assert!(json.contains(r#""UserID":"uid-9""#));
        assert!(json.contains(r#""VideoID":"video-7""#));
        assert!(json.contains(r#""Message":"great upload""#));
        assert!(json.contains(r#""CreatedAt":"#));
        assert!(json.contains(r#""User":{"#));
        assert!(json.contains(r#""AvatarURL":"https://cdn.example.com/a.png""#));
    }
}
