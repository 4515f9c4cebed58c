//! Store context: owns the shared store and hands out per-request bindings.
//!
//! Lifecycle: [`StoreContext::new`] (initializing) → [`StoreContext::init`]
//! (ready) → [`StoreContext::shutdown`] (closed). Every operation made through
//! a [`CollectionHandle`] first checks that the context is ready and the store
//! reachable, so an outage short-circuits before any work is attempted.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::backend::DocumentStore;
use super::document::{Document, Filter, InsertOutcome, UpdateOutcome};
use super::error::{StoreError, StoreResult};
use super::memory::MemoryStore;
use crate::core::config::{StoreBackend, StoreConfig};

/// Lifecycle state of a [`StoreContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Initializing,
    Ready,
    Closed,
}

impl StoreState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Closed => "closed",
        }
    }
}

/// Explicit owner of the document store connection.
pub struct StoreContext {
    store: Arc<dyn DocumentStore>,
    state: RwLock<StoreState>,
}

impl StoreContext {
    /// Wrap an existing store. The context starts in [`StoreState::Initializing`].
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            state: RwLock::new(StoreState::Initializing),
        }
    }

    /// Build the configured backend and bring it to [`StoreState::Ready`].
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let store: Arc<dyn DocumentStore> = match config.backend {
            StoreBackend::Memory => match &config.seed_path {
                Some(path) => Arc::new(MemoryStore::from_seed_file(path)?),
                None => Arc::new(MemoryStore::new()),
            },
            StoreBackend::Mongo => Self::connect_mongo(config).await?,
        };

        let context = Self::new(store);
        context.init().await?;
        Ok(context)
    }

    #[cfg(feature = "mongo")]
    async fn connect_mongo(config: &StoreConfig) -> StoreResult<Arc<dyn DocumentStore>> {
        let uri = config
            .uri
            .as_deref()
            .ok_or_else(|| StoreError::unavailable("no MongoDB URI configured"))?;
        let store = super::mongo::MongoStore::connect(uri, &config.database).await?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "mongo"))]
    async fn connect_mongo(_config: &StoreConfig) -> StoreResult<Arc<dyn DocumentStore>> {
        Err(StoreError::unavailable(
            "MongoDB backend not compiled in (rebuild with --features mongo)",
        ))
    }

    /// Verify the store answers and mark the context ready.
    pub async fn init(&self) -> StoreResult<()> {
        self.store.ping().await?;
        *self.state.write().await = StoreState::Ready;
        info!("Document store ready (backend: {})", self.store.backend_name());
        Ok(())
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> StoreState {
        *self.state.read().await
    }

    /// Name of the underlying backend.
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Fail with [`StoreError::Unavailable`] unless the store can take work.
    ///
    /// A store last seen offline gets one ping to recover before giving up.
    pub async fn ensure_available(&self) -> StoreResult<()> {
        let state = self.state().await;
        if state != StoreState::Ready {
            return Err(StoreError::unavailable(format!(
                "store context is {}",
                state.as_str()
            )));
        }

        if self.store.is_available() {
            return Ok(());
        }

        self.store.ping().await.inspect_err(|e| {
            warn!("Document store still unavailable: {}", e);
        })
    }

    /// Bind `name` to a collection handle for the duration of one request.
    pub fn collection(&self, name: impl Into<String>) -> CollectionHandle<'_> {
        CollectionHandle {
            context: self,
            name: name.into(),
        }
    }

    /// Close the store. Subsequent operations fail as unavailable.
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        if *state == StoreState::Closed {
            return;
        }
        *state = StoreState::Closed;
        drop(state);

        self.store.shutdown().await;
        info!("Document store closed");
    }
}

/// A collection name resolved against the store. Lives for one request.
pub struct CollectionHandle<'a> {
    context: &'a StoreContext,
    name: String,
}

impl CollectionHandle<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn find_all(&self) -> StoreResult<Vec<Document>> {
        self.context.ensure_available().await?;
        self.context.store.find_all(&self.name).await
    }

    pub async fn insert_one(&self, document: Document) -> StoreResult<InsertOutcome> {
        self.context.ensure_available().await?;
        self.context.store.insert_one(&self.name, document).await
    }

    pub async fn update_one(
        &self,
        filter: &Filter,
        changes: Document,
    ) -> StoreResult<UpdateOutcome> {
        self.context.ensure_available().await?;
        self.context
            .store
            .update_one(&self.name, filter, changes)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn ready_context() -> (Arc<MemoryStore>, StoreContext) {
        let store = Arc::new(MemoryStore::new());
        let context = StoreContext::new(store.clone());
        context.init().await.unwrap();
        (store, context)
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let context = StoreContext::new(Arc::new(MemoryStore::new()));
        assert_eq!(context.state().await, StoreState::Initializing);
        assert!(context.ensure_available().await.is_err());

        context.init().await.unwrap();
        assert_eq!(context.state().await, StoreState::Ready);
        assert!(context.ensure_available().await.is_ok());

        context.shutdown().await;
        assert_eq!(context.state().await, StoreState::Closed);
        assert!(matches!(
            context.collection("lessons").find_all().await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_init_fails_when_store_offline() {
        let store = Arc::new(MemoryStore::new());
        store.set_available(false);
        let context = StoreContext::new(store);

        assert!(matches!(
            context.init().await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(context.state().await, StoreState::Initializing);
    }

    #[tokio::test]
    async fn test_handle_short_circuits_when_offline() {
        let (store, context) = ready_context().await;
        store.set_available(false);

        let handle = context.collection("orders");
        assert_eq!(handle.name(), "orders");
        assert!(matches!(
            handle.insert_one(Document::new()).await,
            Err(StoreError::Unavailable(_))
        ));

        store.set_available(true);
        assert!(handle.insert_one(Document::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_handles_share_the_store() {
        let (_store, context) = ready_context().await;
        let doc = json!({ "item": "pencil" }).as_object().cloned().unwrap();

        context.collection("orders").insert_one(doc).await.unwrap();
        let listed = context.collection("orders").find_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["item"], json!("pencil"));
    }

    #[tokio::test]
    async fn test_connect_memory_backend() {
        let config = StoreConfig::default();
        let context = StoreContext::connect(&config).await.unwrap();
        assert_eq!(context.backend_name(), "memory");
        assert_eq!(context.state().await, StoreState::Ready);
    }

    #[cfg(not(feature = "mongo"))]
    #[tokio::test]
    async fn test_connect_mongo_without_feature_fails_fast() {
        let config = StoreConfig {
            backend: StoreBackend::Mongo,
            uri: Some("mongodb://localhost:27017".to_string()),
            ..StoreConfig::default()
        };
        assert!(matches!(
            StoreContext::connect(&config).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
