//! Dynamic collections domain module.
//!
//! Generic passthrough to any collection named in the request path:
//! list everything, insert a document, merge-update a document by its
//! store-native identifier.

mod error;
mod router;

pub use error::CollectionError;
pub use router::CollectionRouter;
