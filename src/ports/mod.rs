//! Ports - trait interfaces between the application core and adapters.

mod comment_repository;
mod live_comment_publisher;
mod session_validator;

pub use comment_repository::{CommentRepository, CommentRepositoryError};
pub use live_comment_publisher::LiveCommentPublisher;
pub use session_validator::SessionValidator;
