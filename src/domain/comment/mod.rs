//! Comment domain - the entity broadcast to live viewers.

mod comment;

pub use comment::{Comment, CommentAuthor, CommentDraft, MAX_MESSAGE_LENGTH};
