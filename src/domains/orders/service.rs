//! Order service implementation.

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::error::OrderError;
use super::handlers::OrderReceipt;
use crate::domains::store::StoreContext;

/// Name of the collection holding orders.
pub const ORDERS_COLLECTION: &str = "orders";

/// Service for placing orders.
pub struct OrderService {
    store: Arc<StoreContext>,
}

impl OrderService {
    /// Create a new OrderService over `store`.
    pub fn new(store: Arc<StoreContext>) -> Self {
        info!("Initializing OrderService");
        Self { store }
    }

    /// Persist `order` verbatim and return its new identifier.
    #[instrument(skip_all)]
    pub async fn create(&self, order: Value) -> Result<OrderReceipt, OrderError> {
        let Value::Object(order) = order else {
            return Err(OrderError::invalid_order("expected a JSON object"));
        };

        let outcome = self
            .store
            .collection(ORDERS_COLLECTION)
            .insert_one(order)
            .await?;
        info!("Order created: {}", outcome.inserted_id);

        Ok(OrderReceipt::created(outcome.inserted_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::store::{MemoryStore, StoreError};
    use serde_json::json;

    async fn service() -> (Arc<MemoryStore>, Arc<StoreContext>, OrderService) {
        let memory = Arc::new(MemoryStore::new());
        let context = Arc::new(StoreContext::new(memory.clone()));
        context.init().await.unwrap();
        (memory, context.clone(), OrderService::new(context))
    }

    #[tokio::test]
    async fn test_create_order_stores_document_verbatim() {
        let (_memory, context, service) = service().await;
        let order = json!({ "name": "Ada", "phone": "0123", "lessons": [1, 2] });

        let receipt = service.create(order).await.unwrap();
        assert!(receipt.success);
        let order_id = receipt.order_id.as_str().unwrap();
        assert!(!order_id.is_empty());

        let stored = context.collection(ORDERS_COLLECTION).find_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["_id"], json!(order_id));
        assert_eq!(stored[0]["name"], json!("Ada"));
        assert_eq!(stored[0]["lessons"], json!([1, 2]));
    }

    #[tokio::test]
    async fn test_create_order_rejects_non_objects() {
        let (_memory, _context, service) = service().await;
        for body in [json!([1, 2]), json!("order"), json!(null)] {
            assert!(matches!(
                service.create(body).await,
                Err(OrderError::InvalidOrder(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_create_order_store_unavailable() {
        let (memory, _context, service) = service().await;
        memory.set_available(false);

        assert!(matches!(
            service.create(json!({ "name": "Ada" })).await,
            Err(OrderError::Store(StoreError::Unavailable(_)))
        ));
    }
}
