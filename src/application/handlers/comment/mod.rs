//! Comment use cases.

mod create_comment;
mod list_comments;

pub use create_comment::{CreateCommentCommand, CreateCommentError, CreateCommentHandler};
pub use list_comments::ListCommentsHandler;
