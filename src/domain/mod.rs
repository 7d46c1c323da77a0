//! Domain layer - entities and value objects with no infrastructure
//! dependencies.

pub mod comment;
pub mod foundation;
