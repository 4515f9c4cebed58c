//! Dynamic collection router.
//!
//! Resolves the collection named in a request path to a per-request
//! [`CollectionHandle`] and runs the generic list/insert/update operations on
//! it. The name is checked against the configured access policy before the
//! store is involved; nothing about the binding outlives the request.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::error::CollectionError;
use crate::core::config::Config;
use crate::core::security::validate_collection;
use crate::domains::store::{
    CollectionHandle, Document, DocumentId, Filter, InsertOutcome, StoreContext, UpdateOutcome,
};

/// Dispatches generic operations to collections named at request time.
pub struct CollectionRouter {
    config: Arc<Config>,
    store: Arc<StoreContext>,
}

impl CollectionRouter {
    /// Create a new CollectionRouter.
    pub fn new(config: Arc<Config>, store: Arc<StoreContext>) -> Self {
        info!(
            "Initializing CollectionRouter (policy: {})",
            config.collections.policy.describe()
        );
        Self { config, store }
    }

    /// Resolve `name` to a handle, subject to the access policy.
    pub fn bind(&self, name: &str) -> Result<CollectionHandle<'_>, CollectionError> {
        let name = validate_collection(name, &self.config)?;
        debug!("Bound collection '{}'", name);
        Ok(self.store.collection(name))
    }

    /// Every document in the collection.
    #[instrument(skip(self))]
    pub async fn list(&self, name: &str) -> Result<Vec<Document>, CollectionError> {
        let handle = self.bind(name)?;
        Ok(handle.find_all().await?)
    }

    /// Insert `body` as a new document.
    #[instrument(skip(self, body))]
    pub async fn insert(&self, name: &str, body: Value) -> Result<InsertOutcome, CollectionError> {
        let handle = self.bind(name)?;
        let document = into_document(body)?;
        Ok(handle.insert_one(document).await?)
    }

    /// Merge the fields of `body` into the document whose identifier is `id`.
    #[instrument(skip(self, body))]
    pub async fn update(
        &self,
        name: &str,
        id: &str,
        body: Value,
    ) -> Result<UpdateOutcome, CollectionError> {
        let handle = self.bind(name)?;
        let id = DocumentId::parse(id)?;

        let changes = into_document(body)?;
        if changes.is_empty() {
            return Err(CollectionError::invalid_document(
                "update names no fields",
            ));
        }

        Ok(handle.update_one(&Filter::by_id(id), changes).await?)
    }
}

fn into_document(body: Value) -> Result<Document, CollectionError> {
    match body {
        Value::Object(document) => Ok(document),
        other => Err(CollectionError::invalid_document(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
