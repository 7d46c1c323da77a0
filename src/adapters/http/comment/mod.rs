//! Comment HTTP endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::CommentAppState;
pub use routes::comment_routes;
