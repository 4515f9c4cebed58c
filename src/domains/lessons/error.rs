//! Lesson-specific error types.

use thiserror::Error;

use crate::domains::store::StoreError;

/// Errors that can occur during lesson operations.
#[derive(Debug, Error)]
pub enum LessonError {
    /// The lesson identifier in the path is not an integer.
    #[error("Invalid lesson id: {0}")]
    InvalidId(String),

    /// The requested number of spaces is not acceptable.
    #[error("Invalid spaces value: {0}")]
    InvalidSpaces(String),

    /// The search query cannot be compiled into a matcher.
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// The request origin cannot be used to build links.
    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LessonError {
    /// Create a new "invalid id" error.
    pub fn invalid_id(raw: impl Into<String>) -> Self {
        Self::InvalidId(raw.into())
    }

    /// Create a new "invalid spaces" error.
    pub fn invalid_spaces(msg: impl Into<String>) -> Self {
        Self::InvalidSpaces(msg.into())
    }

    /// Create a new "invalid query" error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create a new "invalid origin" error.
    pub fn invalid_origin(msg: impl Into<String>) -> Self {
        Self::InvalidOrigin(msg.into())
    }
}
