//! In-memory document store.
//!
//! Collections are created lazily on first insert, exactly like a document
//! database does, so listing an unknown collection yields an empty list.
//! The lock is only held for the body of one operation and never across an
//! `.await`.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use super::backend::DocumentStore;
use super::document::{Document, DocumentId, Filter, ID_FIELD, InsertOutcome, UpdateOutcome};
use super::error::{StoreError, StoreResult};

/// Document store kept entirely in process memory.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    available: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Create a store pre-populated with `seed`, assigning identifiers where missing.
    pub fn with_collections(seed: HashMap<String, Vec<Document>>) -> Self {
        let collections = seed
            .into_iter()
            .map(|(name, docs)| (name, docs.into_iter().map(with_identifier).collect()))
            .collect();

        Self {
            collections: RwLock::new(collections),
            available: AtomicBool::new(true),
        }
    }

    /// Load a seed file shaped as `{ "<collection>": [ {..}, .. ], .. }`.
    pub fn from_seed_file(path: &Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::unavailable(format!("cannot read seed file {}: {}", path.display(), e))
        })?;

        let parsed: HashMap<String, Vec<Value>> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::invalid_document(format!("seed file: {}", e)))?;

        let mut seed = HashMap::with_capacity(parsed.len());
        for (name, values) in parsed {
            let docs = values
                .into_iter()
                .map(|value| match value {
                    Value::Object(doc) => Ok(doc),
                    other => Err(StoreError::invalid_document(format!(
                        "seed entry in '{}' is not an object: {}",
                        name, other
                    ))),
                })
                .collect::<StoreResult<Vec<_>>>()?;
            info!("Seeded collection '{}' with {} documents", name, docs.len());
            seed.insert(name, docs);
        }

        Ok(Self::with_collections(seed))
    }

    /// Simulate losing (or regaining) the connection.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(StoreError::unavailable("in-memory store is offline"))
        }
    }

    fn poisoned() -> StoreError {
        StoreError::operation_failed("in-memory store lock poisoned")
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn with_identifier(mut document: Document) -> Document {
    if !document.contains_key(ID_FIELD) {
        document.insert(ID_FIELD.to_string(), Value::String(DocumentId::new().to_hex()));
    }
    document
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> StoreResult<InsertOutcome> {
        self.check_available()?;
        let document = with_identifier(document);
        let inserted_id = document.get(ID_FIELD).cloned().unwrap_or(Value::Null);

        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.iter().any(|existing| existing.get(ID_FIELD) == Some(&inserted_id)) {
            return Err(StoreError::operation_failed(format!(
                "duplicate key in '{}': {}",
                collection, inserted_id
            )));
        }

        docs.push(document);
        debug!("Inserted {} into '{}'", inserted_id, collection);

        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: Document,
    ) -> StoreResult<UpdateOutcome> {
        self.check_available()?;
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;

        let Some(target) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| filter.matches(doc)))
        else {
            return Ok(UpdateOutcome::unmatched());
        };

        if let Some(new_id) = changes.get(ID_FIELD) {
            if target.get(ID_FIELD) != Some(new_id) {
                return Err(StoreError::operation_failed(
                    "the '_id' field is immutable",
                ));
            }
        }

        let mut modified = false;
        for (field, value) in changes {
            if target.get(&field) != Some(&value) {
                target.insert(field, value);
                modified = true;
            }
        }

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }
}
