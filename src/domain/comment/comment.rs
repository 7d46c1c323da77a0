//! Comment entity and the draft validated on creation.

use serde::Serialize;

use crate::domain::foundation::{CommentId, Timestamp, UserId, ValidationError, VideoId};

/// Maximum accepted comment length, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Snapshot of the user who authored a comment, hydrated from the store
/// when the comment row is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentAuthor {
    #[serde(rename = "ID")]
    pub id: UserId,

    #[serde(rename = "Username")]
    pub username: String,

    #[serde(rename = "AvatarURL")]
    pub avatar_url: Option<String>,
}

/// A persisted comment. Immutable once loaded: `created_at` is always the
/// store-assigned value, never a handler-local clock read, so the live
/// stream and the fetched history agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    #[serde(rename = "ID")]
    pub id: CommentId,

    #[serde(rename = "VideoID")]
    pub video_id: VideoId,

    #[serde(rename = "Message")]
    pub message: String,

    #[serde(rename = "CreatedAt")]
    pub created_at: Timestamp,

    #[serde(rename = "User")]
    pub author: CommentAuthor,
}

/// A comment as submitted by a user, validated but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    user_id: UserId,
    video_id: VideoId,
    message: String,
}

impl CommentDraft {
    /// Validates and creates a draft ready for persistence.
    ///
    /// The message must be non-empty after trimming and at most
    /// [`MAX_MESSAGE_LENGTH`] characters. Surrounding whitespace is kept
    /// as submitted; only fully-blank messages are rejected.
    pub fn new(
        user_id: UserId,
        video_id: VideoId,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        if message.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(ValidationError::too_long("message", MAX_MESSAGE_LENGTH));
        }
        Ok(Self {
            user_id,
            video_id,
            message,
        })
    }

    /// The submitting user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The target video.
    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    /// The message text.
    pub fn message(&self) -> &str {
        &self.message
    }
}
