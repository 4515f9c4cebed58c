//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the lessons API,
//! including error handling, configuration, collection access policy, server
//! lifecycle management, and the HTTP transport.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use security::{CollectionPolicy, validate_collection};
pub use server::ApiServer;
pub use transport::{HttpConfig, TransportService};
