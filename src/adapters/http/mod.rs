//! HTTP adapters - axum routes, handlers, and middleware.

pub mod comment;
pub mod middleware;
