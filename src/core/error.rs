//! Error types and handling for the lessons API.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies, and classifies each of them into
//! an [`ErrorKind`] the HTTP layer turns into a status code.

use thiserror::Error;

use super::security::CollectionAccessError;
use super::transport::TransportError;
use crate::domains::collections::CollectionError;
use crate::domains::lessons::LessonError;
use crate::domains::orders::OrderError;
use crate::domains::store::StoreError;

/// A specialized Result type for service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the service.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the document store.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Error originating from the dynamic collections domain.
    #[error("{0}")]
    Collection(#[from] CollectionError),

    /// Error originating from the lessons domain.
    #[error("{0}")]
    Lesson(#[from] LessonError),

    /// Error originating from the orders domain.
    #[error("{0}")]
    Order(#[from] OrderError),

    /// The request could not be understood.
    #[error("Bad input: {0}")]
    BadInput(String),

    /// Errors from the HTTP transport.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Coarse classification used for status codes and error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StoreUnavailable,
    MalformedIdentifier,
    BadInput,
    CollectionNotAllowed,
    StoreOperationFailure,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StoreUnavailable => "store_unavailable",
            Self::MalformedIdentifier => "malformed_identifier",
            Self::BadInput => "bad_input",
            Self::CollectionNotAllowed => "collection_not_allowed",
            Self::StoreOperationFailure => "store_operation_failure",
            Self::Internal => "internal",
        }
    }
}

fn store_kind(err: &StoreError) -> ErrorKind {
    match err {
        StoreError::Unavailable(_) => ErrorKind::StoreUnavailable,
        StoreError::MalformedIdentifier(_) => ErrorKind::MalformedIdentifier,
        StoreError::InvalidDocument(_) => ErrorKind::BadInput,
        StoreError::OperationFailed(_) => ErrorKind::StoreOperationFailure,
    }
}

impl Error {
    /// Create a new bad-input error.
    pub fn bad_input(msg: impl Into<String>) -> Self {
        Self::BadInput(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(err) => store_kind(err),
            Self::Collection(err) => match err {
                CollectionError::Access(CollectionAccessError::NotAllowed { .. }) => {
                    ErrorKind::CollectionNotAllowed
                }
                CollectionError::Access(CollectionAccessError::InvalidName { .. }) => {
                    ErrorKind::BadInput
                }
                CollectionError::InvalidDocument(_) => ErrorKind::BadInput,
                CollectionError::Store(err) => store_kind(err),
            },
            Self::Lesson(err) => match err {
                LessonError::Store(err) => store_kind(err),
                LessonError::InvalidId(_)
                | LessonError::InvalidSpaces(_)
                | LessonError::InvalidQuery(_)
                | LessonError::InvalidOrigin(_) => ErrorKind::BadInput,
            },
            Self::Order(err) => match err {
                OrderError::Store(err) => store_kind(err),
                OrderError::InvalidOrder(_) => ErrorKind::BadInput,
            },
            Self::BadInput(_) => ErrorKind::BadInput,
            Self::Transport(_) => ErrorKind::Internal,
        }
    }
}
