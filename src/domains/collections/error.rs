//! Collection-router error types.

use thiserror::Error;

use crate::core::security::CollectionAccessError;
use crate::domains::store::StoreError;

/// Errors that can occur while serving a dynamic collection request.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The collection name was refused by the access policy.
    #[error(transparent)]
    Access(#[from] CollectionAccessError),

    /// The request body is not a usable document.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CollectionError {
    /// Create a new "invalid document" error.
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }
}
