//! Document store domain module.
//!
//! The adapter between the HTTP layer and the document database. It exposes
//! named-collection lookup, whole-collection scans, inserts and filtered
//! merge updates, independent of which backend holds the data.
//!
//! ## Architecture
//!
//! - `backend.rs` - The [`DocumentStore`] trait every backend implements
//! - `context.rs` - [`StoreContext`] lifecycle and per-request [`CollectionHandle`]s
//! - `document.rs` - Documents, identifiers, filters and operation outcomes
//! - `memory.rs` - In-process backend (default, used by tests)
//! - `mongo.rs` - MongoDB backend - feature: `mongo`

mod backend;
mod context;
mod document;
mod error;
mod memory;

#[cfg(feature = "mongo")]
mod mongo;

pub use backend::DocumentStore;
pub use context::{CollectionHandle, StoreContext, StoreState};
pub use document::{Document, DocumentId, Filter, ID_FIELD, InsertOutcome, UpdateOutcome};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

#[cfg(feature = "mongo")]
pub use mongo::MongoStore;
