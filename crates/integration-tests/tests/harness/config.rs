//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use voxgate_config::{Config, HealthConfig, ServerConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                ..Config::default()
            },
        }
    }

    /// Point the Gemini provider at a mock backend
    pub fn with_gemini_base_url(mut self, base_url: &str) -> Self {
        self.config.gemini.base_url = base_url.parse().expect("valid URL");
        self
    }

    /// Probe this URL from `/test-proxy`
    pub fn with_probe_url(mut self, url: &str) -> Self {
        self.config.proxy_probe.url = url.parse().expect("valid URL");
        self
    }

    /// Override the `/test-proxy` timeout
    pub fn with_probe_timeout(mut self, timeout: &str) -> Self {
        self.config.proxy_probe.timeout = timeout.to_owned();
        self
    }

    /// Override the language-code correction timeout
    pub fn with_repair_timeout(mut self, timeout: &str) -> Self {
        self.config.gemini.repair_timeout = timeout.to_owned();
        self
    }

    /// Serve the health check on another path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}
