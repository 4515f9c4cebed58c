//! The document store seam.
//!
//! Every backend implements [`DocumentStore`]. Handlers never see a backend
//! directly; they go through [`StoreContext`](super::StoreContext), which owns
//! the single shared instance.

use async_trait::async_trait;

use super::document::{Document, Filter, InsertOutcome, UpdateOutcome};
use super::error::StoreResult;

/// Operations a document database must provide against named collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Cheap, non-blocking view of the last known connectivity.
    fn is_available(&self) -> bool;

    /// Round-trip to the store, refreshing [`is_available`](Self::is_available).
    async fn ping(&self) -> StoreResult<()>;

    /// Return every document in `collection`, in storage order.
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Insert one document, assigning an identifier if it carries none.
    async fn insert_one(&self, collection: &str, document: Document)
    -> StoreResult<InsertOutcome>;

    /// Merge `changes` into the first document matching `filter`.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: Document,
    ) -> StoreResult<UpdateOutcome>;

    /// Release the underlying connection.
    async fn shutdown(&self) {}
}
