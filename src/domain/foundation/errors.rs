//! Validation errors for value-object construction.

use thiserror::Error;

/// Errors raised when constructing domain value objects from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty.
    #[error("Field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// A field exceeded its maximum length.
    #[error("Field '{field}' exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl ValidationError {
    /// Creates an empty-field error.
    pub fn empty_field(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    /// Creates a too-long error.
    pub fn too_long(field: &'static str, max: usize) -> Self {
        Self::TooLong { field, max }
    }
}
