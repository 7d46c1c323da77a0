//! PostgreSQL adapters.

mod comment_repository;

pub use comment_repository::PostgresCommentRepository;
