//! Use case handlers.

pub mod comment;
