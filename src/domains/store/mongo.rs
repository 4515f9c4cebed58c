//! MongoDB document store (feature `mongo`).
//!
//! Documents cross the boundary as relaxed extended JSON, with the `_id`
//! ObjectId flattened to its hex string so callers never see `{"$oid": ..}`.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document as BsonDocument, doc, oid::ObjectId};
use mongodb::error::ErrorKind;
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use super::backend::DocumentStore;
use super::document::{Document, Filter, ID_FIELD, InsertOutcome, UpdateOutcome};
use super::error::{StoreError, StoreResult};

/// Document store backed by a MongoDB database.
pub struct MongoStore {
    client: Client,
    database: Database,
    healthy: AtomicBool,
}

impl MongoStore {
    /// Build a client for `uri` and select `database`.
    ///
    /// The driver connects lazily; call [`DocumentStore::ping`] to verify reachability.
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        let database = client.database(database);

        info!("MongoDB client created for database '{}'", database.name());

        Ok(Self {
            client,
            database,
            healthy: AtomicBool::new(false),
        })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.database.collection::<BsonDocument>(name)
    }

    /// Map a driver error, remembering connectivity loss.
    fn classify(&self, err: mongodb::error::Error) -> StoreError {
        match *err.kind {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => {
                if self.healthy.swap(false, Ordering::SeqCst) {
                    warn!("Lost connection to MongoDB: {}", err);
                }
                StoreError::unavailable(err.to_string())
            }
            _ => StoreError::operation_failed(err.to_string()),
        }
    }

    fn mark_healthy(&self) {
        self.healthy.store(true, Ordering::SeqCst);
    }

    fn filter_to_bson(filter: &Filter) -> StoreResult<BsonDocument> {
        let mut query = BsonDocument::new();
        match filter {
            Filter::Id(id) => {
                let oid = ObjectId::parse_str(id.to_hex())
                    .map_err(|_| StoreError::malformed_identifier(id.to_hex()))?;
                query.insert(ID_FIELD, oid);
            }
            Filter::FieldEquals { field, value } => {
                let value = bson::to_bson(value)
                    .map_err(|e| StoreError::invalid_document(e.to_string()))?;
                query.insert(field.as_str(), value);
            }
        }
        Ok(query)
    }
}

fn to_bson_document(document: &Document) -> StoreResult<BsonDocument> {
    bson::to_document(document).map_err(|e| StoreError::invalid_document(e.to_string()))
}

fn bson_to_value(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        other => other.into_relaxed_extjson(),
    }
}

fn from_bson_document(mut document: BsonDocument) -> Document {
    if let Some(Bson::ObjectId(oid)) = document.get(ID_FIELD) {
        let hex = oid.to_hex();
        document.insert(ID_FIELD, hex);
    }

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend_name(&self) -> &'static str {
        "mongo"
    }

    fn is_available(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| self.classify(e))?;
        self.mark_healthy();
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .find(doc! {})
            .await
            .map_err(|e| self.classify(e))?;
        let docs: Vec<BsonDocument> = cursor.try_collect().await.map_err(|e| self.classify(e))?;
        self.mark_healthy();

        Ok(docs.into_iter().map(from_bson_document).collect())
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> StoreResult<InsertOutcome> {
        let document = to_bson_document(&document)?;
        let result = self
            .collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| self.classify(e))?;
        self.mark_healthy();

        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: bson_to_value(result.inserted_id),
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        changes: Document,
    ) -> StoreResult<UpdateOutcome> {
        let filter = Self::filter_to_bson(filter)?;
        let changes = to_bson_document(&changes)?;
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": changes })
            .await
            .map_err(|e| self.classify(e))?;
        self.mark_healthy();

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn shutdown(&self) {
        info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_id_is_flattened_to_hex() {
        let oid = ObjectId::new();
        let document = doc! { "_id": oid, "subject": "Math", "price": 25 };

        let converted = from_bson_document(document);
        assert_eq!(converted["_id"], json!(oid.to_hex()));
        assert_eq!(converted["subject"], json!("Math"));
        assert_eq!(converted["price"], json!(25));
    }

    #[test]
    fn test_filter_translation() {
        let id = crate::domains::store::DocumentId::new();
        let by_id = MongoStore::filter_to_bson(&Filter::by_id(id)).unwrap();
        assert_eq!(
            by_id.get_object_id("_id").unwrap().to_hex(),
            id.to_hex()
        );

        let by_field = MongoStore::filter_to_bson(&Filter::field_equals("id", 7)).unwrap();
        assert!(by_field.contains_key("id"));
    }
}
