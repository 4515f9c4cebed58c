//! Lesson service implementation.
//!
//! Reads and updates the fixed `lessons` collection. Every lesson leaving the
//! service passes through the [`ImageNormalizer`] for the caller's origin.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::error::LessonError;
use super::normalizer::{ImageNormalizer, Origin};
use super::search::SearchMatcher;
use crate::core::config::ImagesConfig;
use crate::domains::store::{CollectionHandle, Document, Filter, StoreContext};

/// Name of the collection holding lessons.
pub const LESSONS_COLLECTION: &str = "lessons";

/// Application-level identifier field (distinct from the store's `_id`).
pub const LESSON_ID_FIELD: &str = "id";

const SPACES_FIELD: &str = "spaces";

/// Result of a spaces update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacesUpdate {
    /// The lesson now holds the requested value.
    Updated,

    /// The lesson already held the requested value.
    Unchanged,

    /// No lesson carries the given id.
    NotFound,
}

/// Service for listing, searching and updating lessons.
pub struct LessonService {
    store: Arc<StoreContext>,
    normalizer: ImageNormalizer,
}

impl LessonService {
    /// Create a new LessonService over `store`.
    pub fn new(store: Arc<StoreContext>, images: &ImagesConfig) -> Self {
        info!("Initializing LessonService");

        Self {
            store,
            normalizer: ImageNormalizer::new(images.placeholder.clone()),
        }
    }

    fn lessons(&self) -> CollectionHandle<'_> {
        self.store.collection(LESSONS_COLLECTION)
    }

    /// List all lessons with absolute image links.
    pub async fn list(&self, origin: &Origin) -> Result<Vec<Document>, LessonError> {
        let lessons = self.lessons().find_all().await?;
        Ok(self.normalizer.normalize_all(&lessons, origin))
    }

    /// Lessons matching `query`, with absolute image links.
    ///
    /// An absent or empty query yields no lessons without touching the store.
    #[instrument(skip(self, origin))]
    pub async fn search(
        &self,
        query: Option<&str>,
        origin: &Origin,
    ) -> Result<Vec<Document>, LessonError> {
        let Some(matcher) = SearchMatcher::new(query.unwrap_or_default())? else {
            debug!("Empty search query");
            return Ok(Vec::new());
        };

        let matches = matcher.filter(self.lessons().find_all().await?);
        debug!("Search matched {} lessons", matches.len());

        Ok(self.normalizer.normalize_all(&matches, origin))
    }

    /// Set the remaining spaces of the lesson whose `id` is `lesson_id`.
    #[instrument(skip(self))]
    pub async fn update_spaces(
        &self,
        lesson_id: i64,
        spaces: i64,
    ) -> Result<SpacesUpdate, LessonError> {
        if spaces < 0 {
            return Err(LessonError::invalid_spaces(format!(
                "{} is negative",
                spaces
            )));
        }

        let mut changes = Document::new();
        changes.insert(SPACES_FIELD.to_string(), Value::from(spaces));

        let outcome = self
            .lessons()
            .update_one(&Filter::field_equals(LESSON_ID_FIELD, lesson_id), changes)
            .await?;

        let update = match (outcome.matched_count, outcome.modified_count) {
            (0, _) => SpacesUpdate::NotFound,
            (_, 0) => SpacesUpdate::Unchanged,
            _ => SpacesUpdate::Updated,
        };
        info!("Lesson {} spaces -> {}: {:?}", lesson_id, spaces, update);

        Ok(update)
    }
}

/// Parse the integer lesson id carried in a request path.
pub fn parse_lesson_id(raw: &str) -> Result<i64, LessonError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| LessonError::invalid_id(raw))
}
