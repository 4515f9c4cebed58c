//! API server implementation and lifecycle management.
//!
//! This module contains the main server handle that coordinates the domain
//! services. It is cheap to clone and is shared with every HTTP handler as
//! router state.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::domains::{
    collections::CollectionRouter,
    lessons::LessonService,
    orders::OrderService,
    store::{StoreContext, StoreState},
};

/// The main API server handle.
#[derive(Clone)]
pub struct ApiServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Owner of the document store connection.
    store: Arc<StoreContext>,

    /// Service for lesson listing, search and updates.
    lesson_service: Arc<LessonService>,

    /// Service for placing orders.
    order_service: Arc<OrderService>,

    /// Router for dynamically named collections.
    collection_router: Arc<CollectionRouter>,
}

impl ApiServer {
    /// Create a new server over an initialized store context.
    pub fn new(config: Config, store: Arc<StoreContext>) -> Self {
        let config = Arc::new(config);

        let lesson_service = Arc::new(LessonService::new(store.clone(), &config.images));
        let order_service = Arc::new(OrderService::new(store.clone()));
        let collection_router = Arc::new(CollectionRouter::new(config.clone(), store.clone()));

        Self {
            config,
            store,
            lesson_service,
            order_service,
            collection_router,
        }
    }

    /// Connect the configured store and build the server, failing fast if
    /// the store cannot be reached.
    pub async fn connect(config: Config) -> super::Result<Self> {
        let store = StoreContext::connect(&config.store).await?;
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn store(&self) -> &Arc<StoreContext> {
        &self.store
    }

    pub fn lessons(&self) -> &LessonService {
        &self.lesson_service
    }

    pub fn orders(&self) -> &OrderService {
        &self.order_service
    }

    pub fn collections(&self) -> &CollectionRouter {
        &self.collection_router
    }

    /// Health summary; the flag is false when the store cannot take work.
    pub async fn health(&self) -> (bool, Value) {
        let state = self.store.state().await;
        let available = state == StoreState::Ready && self.store.ensure_available().await.is_ok();

        let body = serde_json::json!({
            "status": if available { "healthy" } else { "degraded" },
            "name": self.name(),
            "version": self.version(),
            "store": {
                "backend": self.store.backend_name(),
                "state": state.as_str(),
                "available": available,
            },
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (available, body)
    }

    /// Release the store connection.
    pub async fn shutdown(&self) {
        info!("Shutting down {}", self.name());
        self.store.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::store::MemoryStore;

    #[tokio::test]
    async fn test_connect_with_default_config() {
        let server = ApiServer::connect(Config::default()).await.unwrap();
        assert_eq!(server.name(), "lessons-api");
        assert_eq!(server.store().backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_health_reflects_store() {
        let memory = Arc::new(MemoryStore::new());
        let context = Arc::new(StoreContext::new(memory.clone()));
        context.init().await.unwrap();
        let server = ApiServer::new(Config::default(), context);

        let (healthy, body) = server.health().await;
        assert!(healthy);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"]["backend"], "memory");

        memory.set_available(false);
        let (healthy, body) = server.health().await;
        assert!(!healthy);
        assert_eq!(body["status"], "degraded");

        memory.set_available(true);
        server.shutdown().await;
        let (healthy, body) = server.health().await;
        assert!(!healthy);
        assert_eq!(body["store"]["state"], "closed");
    }
}
