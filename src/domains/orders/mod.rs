//! Orders domain module.
//!
//! Orders are free-form purchase documents. They are stored exactly as
//! submitted in the fixed `orders` collection.

mod error;
mod handlers;
mod service;

pub use error::OrderError;
pub use handlers::*;
pub use service::{ORDERS_COLLECTION, OrderService};
