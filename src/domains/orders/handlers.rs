//! Response body for order creation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reply to `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub success: bool,
    pub message: String,

    /// Identifier the store assigned to the order.
    pub order_id: Value,
}

impl OrderReceipt {
    pub fn created(order_id: Value) -> Self {
        Self {
            success: true,
            message: "Order created".to_string(),
            order_id,
        }
    }
}
