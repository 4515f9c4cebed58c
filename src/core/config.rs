//! Configuration management for the lessons API.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or defaults.

use super::security::CollectionPolicy;
use super::transport::HttpConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the service.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// HTTP transport configuration.
    pub transport: HttpConfig,

    /// Document store configuration.
    pub store: StoreConfig,

    /// Dynamic collection access configuration.
    pub collections: CollectionsConfig,

    /// Static image configuration.
    pub images: ImagesConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported in health output.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Which document store backend to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store, optionally seeded from a JSON file.
    #[default]
    Memory,

    /// MongoDB (requires the `mongo` feature).
    Mongo,
}

impl StoreBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "memory" | "mem" => Some(Self::Memory),
            "mongo" | "mongodb" => Some(Self::Mongo),
            _ => None,
        }
    }
}

/// Document store configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend selection.
    pub backend: StoreBackend,

    /// Connection string for network backends.
    pub uri: Option<String>,

    /// Database name for network backends.
    pub database: String,

    /// JSON file `{ "<collection>": [ .. ] }` loaded into the memory backend.
    pub seed_path: Option<PathBuf>,
}

/// Custom Debug implementation to redact credentials embedded in the URI.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("uri", &self.uri.as_ref().map(|_| "[REDACTED]"))
            .field("database", &self.database)
            .field("seed_path", &self.seed_path)
            .finish()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            uri: None,
            database: "lessons".to_string(),
            seed_path: None,
        }
    }
}

/// Configuration for the dynamic collection router.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionsConfig {
    /// Which collection names may be bound.
    pub policy: CollectionPolicy,
}

/// Configuration for static images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Directory served under `/images`.
    pub dir: PathBuf,

    /// File served (and linked) when an image is missing.
    pub placeholder: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("images"),
            placeholder: "placeholder.png".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "lessons-api".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            transport: HttpConfig::default(),
            store: StoreConfig::default(),
            collections: CollectionsConfig::default(),
            images: ImagesConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `LESSONS_`.
    /// For example: `LESSONS_SERVER_NAME`, `LESSONS_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("LESSONS_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("LESSONS_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = HttpConfig::from_env();

        if let Ok(backend) = std::env::var("LESSONS_STORE_BACKEND") {
            match StoreBackend::parse(&backend) {
                Some(parsed) => config.store.backend = parsed,
                None => warn!("Unknown store backend '{}', using memory", backend),
            }
        }

        if let Ok(uri) = std::env::var("LESSONS_MONGO_URI") {
            config.store.uri = Some(uri);
            if std::env::var("LESSONS_STORE_BACKEND").is_err() {
                config.store.backend = StoreBackend::Mongo;
            }
        }

        if let Ok(database) = std::env::var("LESSONS_MONGO_DB") {
            config.store.database = database;
        }

        if let Ok(seed) = std::env::var("LESSONS_SEED_PATH") {
            config.store.seed_path = Some(PathBuf::from(seed));
        }

        if let Ok(allowed) = std::env::var("LESSONS_ALLOWED_COLLECTIONS") {
            config.collections.policy = CollectionPolicy::from_csv(&allowed);
            info!(
                "Collection access policy: {}",
                config.collections.policy.describe()
            );
        } else {
            warn!(
                "LESSONS_ALLOWED_COLLECTIONS not set - dynamic collection routes \
                 accept any well-formed collection name."
            );
        }

        if let Ok(dir) = std::env::var("LESSONS_IMAGES_DIR") {
            config.images.dir = PathBuf::from(dir);
        }

        if let Ok(placeholder) = std::env::var("LESSONS_PLACEHOLDER_IMAGE") {
            config.images.placeholder = placeholder;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const STORE_VARS: [&str; 4] = [
        "LESSONS_STORE_BACKEND",
        "LESSONS_MONGO_URI",
        "LESSONS_MONGO_DB",
        "LESSONS_SEED_PATH",
    ];

    fn clear_store_vars() {
        for var in STORE_VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_default_store_is_memory() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_store_vars();

        let config = Config::from_env();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.database, "lessons");
        assert!(config.store.uri.is_none());
    }

    #[test]
    fn test_mongo_uri_selects_mongo_backend() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_store_vars();
        unsafe {
            std::env::set_var("LESSONS_MONGO_URI", "mongodb://user:secret@db:27017");
            std::env::set_var("LESSONS_MONGO_DB", "school");
        }

        let config = Config::from_env();
        assert_eq!(config.store.backend, StoreBackend::Mongo);
        assert_eq!(config.store.database, "school");

        clear_store_vars();
    }

    #[test]
    fn test_explicit_backend_wins_over_uri() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_store_vars();
        unsafe {
            std::env::set_var("LESSONS_STORE_BACKEND", "memory");
            std::env::set_var("LESSONS_MONGO_URI", "mongodb://db:27017");
        }

        let config = Config::from_env();
        assert_eq!(config.store.backend, StoreBackend::Memory);

        clear_store_vars();
    }

    #[test]
    fn test_allowed_collections_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("LESSONS_ALLOWED_COLLECTIONS", "lessons,orders");
        }

        let config = Config::from_env();
        assert!(config.collections.policy.permits("orders"));
        assert!(!config.collections.policy.permits("users"));

        unsafe {
            std::env::remove_var("LESSONS_ALLOWED_COLLECTIONS");
        }
    }

    #[test]
    fn test_store_uri_redacted_in_debug() {
        let store = StoreConfig {
            uri: Some("mongodb://user:super_secret@db".to_string()),
            ..StoreConfig::default()
        };
        let debug_str = format!("{:?}", store);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret"));
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(StoreBackend::parse("Mongo"), Some(StoreBackend::Mongo));
        assert_eq!(StoreBackend::parse(" mongodb "), Some(StoreBackend::Mongo));
        assert_eq!(StoreBackend::parse("memory"), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::parse("postgres"), None);
    }
}
