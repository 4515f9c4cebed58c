//! Transport layer for the lessons API.
//!
//! The service speaks plain HTTP/JSON:
//! - `config.rs` - Bind address, CORS and public origin settings
//! - `http.rs` - Routes, request origin resolution, error responses and
//!   static image serving
//! - `service.rs` - Starts the transport for an [`ApiServer`](crate::core::ApiServer)

mod config;
mod error;
mod service;

pub mod http;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::{HttpTransport, RequestOrigin, build_router};
pub use service::TransportService;
