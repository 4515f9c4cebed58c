//! Domains module containing business logic organized by bounded contexts.
//!
//! - **store**: Document store adapter and backends
//! - **lessons**: Lesson listing, search, image links and spaces updates
//! - **orders**: Order placement
//! - **collections**: Generic access to collections named in the request path

pub mod collections;
pub mod lessons;
pub mod orders;
pub mod store;
