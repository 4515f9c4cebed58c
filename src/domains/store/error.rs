//! Store-specific error types.

use thiserror::Error;

/// Result type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached. No operation was attempted.
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    /// An identifier could not be parsed in the store's native format.
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// The document cannot be represented by the store.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Any other failure reported by the store while executing an operation.
    #[error("Store operation failed: {0}")]
    OperationFailed(String),
}

impl StoreError {
    /// Create a new "unavailable" error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a new "malformed identifier" error.
    pub fn malformed_identifier(raw: impl Into<String>) -> Self {
        Self::MalformedIdentifier(raw.into())
    }

    /// Create a new "invalid document" error.
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Create a new "operation failed" error.
    pub fn operation_failed(msg: impl Into<String>) -> Self {
        Self::OperationFailed(msg.into())
    }
}
