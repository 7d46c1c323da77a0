//! HTTP handlers for comment endpoints.
//!
//! These handlers connect axum routes to the application layer.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::comment::{
    CreateCommentCommand, CreateCommentError, CreateCommentHandler, ListCommentsHandler,
};
use crate::domain::comment::Comment;
use crate::domain::foundation::VideoId;
use crate::ports::{CommentRepository, CommentRepositoryError, LiveCommentPublisher};

use super::dto::{CreateCommentRequest, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;

/// Comment API error that implements IntoResponse.
pub enum CommentApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for CommentApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            CommentApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            CommentApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            CommentApiError::Internal(msg) => {
                tracing::error!("comment endpoint failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<CreateCommentError> for CommentApiError {
    fn from(error: CreateCommentError) -> Self {
        match error {
            CreateCommentError::Validation(e) => CommentApiError::BadRequest(e.to_string()),
            CreateCommentError::Repository(e) => e.into(),
        }
    }
}

impl From<CommentRepositoryError> for CommentApiError {
    fn from(error: CommentRepositoryError) -> Self {
        match error {
            CommentRepositoryError::AuthorNotFound(id) => {
                CommentApiError::NotFound(format!("User {} not found", id))
            }
            CommentRepositoryError::Database(msg) => CommentApiError::Internal(msg),
        }
    }
}

/// Shared state for the comment endpoints.
#[derive(Clone)]
pub struct CommentAppState {
    pub repository: Arc<dyn CommentRepository>,
    pub publisher: Arc<dyn LiveCommentPublisher>,
}

impl CommentAppState {
    pub fn create_comment_handler(&self) -> CreateCommentHandler {
        CreateCommentHandler::new(self.repository.clone(), self.publisher.clone())
    }

    pub fn list_comments_handler(&self) -> ListCommentsHandler {
        ListCommentsHandler::new(self.repository.clone())
    }
}

/// POST /v1/comments
///
/// Persists a comment and fans it out to live viewers of the video.
pub async fn create_comment(
    State(state): State<CommentAppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), CommentApiError> {
    let video_id = VideoId::new(request.video_id)
        .map_err(|e| CommentApiError::BadRequest(e.to_string()))?;

    let command = CreateCommentCommand {
        user_id: user.id,
        video_id,
        message: request.message,
    };

    let handler = state.create_comment_handler();
    let comment = handler.handle(command).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /v1/videos/:id/comments
///
/// Returns the video's comments, oldest first.
pub async fn list_comments(
    State(state): State<CommentAppState>,
    Path(video_id): Path<String>,
) -> Result<Json<Vec<Comment>>, CommentApiError> {
    let video_id =
        VideoId::new(video_id).map_err(|e| CommentApiError::BadRequest(e.to_string()))?;

    let handler = state.list_comments_handler();
    let comments = handler.handle(&video_id).await?;

    Ok(Json(comments))
}
