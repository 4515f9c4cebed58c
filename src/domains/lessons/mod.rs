//! Lessons domain module.
//!
//! Lessons live in the fixed `lessons` collection. Each carries an
//! application-level integer `id`, a subject, a location, a price, the number
//! of remaining `spaces`, and an optional image reference.
//!
//! ## Architecture
//!
//! - `normalizer.rs` - Absolute image links from stored `image`/`icon` values
//! - `search.rs` - Literal, case-insensitive free-text matching
//! - `service.rs` - Listing, searching and spaces updates against the store
//! - `handlers.rs` - Request and response bodies

mod error;
mod handlers;
mod normalizer;
mod search;
mod service;

pub use error::LessonError;
pub use handlers::*;
pub use normalizer::{IMAGES_PREFIX, ImageNormalizer, Origin};
pub use search::{SEARCH_FIELDS, SearchMatcher, canonical_number};
pub use service::{LESSON_ID_FIELD, LESSONS_COLLECTION, LessonService, SpacesUpdate, parse_lesson_id};
