//! Lessons API Library
//!
//! An HTTP/JSON backend for a lesson-booking storefront, backed by a document
//! store.
//!
//! # Architecture
//!
//! The service is organized into the following modules:
//!
//! - **core**: Configuration, error handling, the server handle and the HTTP transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **store**: Document store adapter (in-memory, or MongoDB with the `mongo` feature)
//!   - **lessons**: Listing, search, image links and spaces updates
//!   - **orders**: Order placement
//!   - **collections**: Generic list/insert/update on named collections
//!
//! # Example
//!
//! ```rust,no_run
//! use lessons_api::core::{ApiServer, Config, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = ApiServer::connect(config.clone()).await?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{ApiServer, Config, Error, Result};
