//! HTTP routes for comment endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{create_comment, list_comments, CommentAppState};

/// Creates the comment router with all routes.
pub fn comment_routes(state: CommentAppState) -> Router {
    Router::new()
        // POST /v1/comments
        .route("/v1/comments", post(create_comment))
        // GET /v1/videos/:id/comments
        .route("/v1/videos/:id/comments", get(list_comments))
        .with_state(state)
}
