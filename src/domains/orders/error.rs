//! Order-specific error types.

use thiserror::Error;

use crate::domains::store::StoreError;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The submitted order is not a JSON object.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrderError {
    /// Create a new "invalid order" error.
    pub fn invalid_order(msg: impl Into<String>) -> Self {
        Self::InvalidOrder(msg.into())
    }
}
