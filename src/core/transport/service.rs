//! Transport service - starts the HTTP transport for a server.

use tracing::info;

use super::{HttpConfig, http::HttpTransport};
use crate::core::{ApiServer, Result};

/// Transport service - manages the transport layer for the API server.
pub struct TransportService {
    config: HttpConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Log information about the configured transport.
    pub fn log_info(&self) {
        info!("Starting transport: {}", self.config.description());
    }

    /// Start the transport with the given server.
    ///
    /// This method blocks until the transport is shut down.
    pub async fn run(self, server: ApiServer) -> Result<()> {
        self.log_info();
        HttpTransport::new(self.config).run(server).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_keeps_config() {
        let service = TransportService::new(HttpConfig::new(8081, "127.0.0.1"));
        assert_eq!(service.config().address(), "127.0.0.1:8081");
    }
}
