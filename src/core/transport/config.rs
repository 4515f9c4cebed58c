//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Fixed `scheme://host[:port]` used for absolute links instead of the
    /// one derived from each request.
    #[serde(default)]
    pub public_origin: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            enable_cors: default_cors(),
            public_origin: None,
        }
    }
}

impl HttpConfig {
    /// Create an HTTP transport config.
    pub fn new(port: u16, host: impl Into<String>) -> Self {
        Self {
            port,
            host: host.into(),
            ..Default::default()
        }
    }

    /// Load transport config from environment variables.
    ///
    /// `LESSONS_HTTP_PORT` takes precedence over the conventional `PORT`.
    pub fn from_env() -> Self {
        let port = std::env::var("LESSONS_HTTP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let host = std::env::var("LESSONS_HTTP_HOST").unwrap_or_else(|_| default_host());
        let enable_cors = std::env::var("LESSONS_HTTP_CORS")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or_else(|_| default_cors());
        let public_origin = std::env::var("LESSONS_PUBLIC_ORIGIN")
            .ok()
            .map(|origin| origin.trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty());

        Self {
            port,
            host,
            enable_cors,
            public_origin,
        }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        format!("HTTP on {}", self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.address(), "0.0.0.0:3000");
        assert!(config.enable_cors);
        assert!(config.public_origin.is_none());
    }

    #[test]
    fn test_new_keeps_other_defaults() {
        let config = HttpConfig::new(8080, "127.0.0.1");
        assert_eq!(config.description(), "HTTP on 127.0.0.1:8080");
        assert!(config.enable_cors);
    }
}
