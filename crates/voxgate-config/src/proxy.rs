use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Proxy connectivity probe configuration for `POST /test-proxy`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyProbeConfig {
    /// Endpoint fetched through the proxy; it should answer with JSON
    #[serde(default = "default_probe_url")]
    pub url: Url,
    /// Upper bound for the probe, e.g. "10s" or "1m"
    #[serde(default = "default_probe_timeout")]
    pub timeout: String,
}

impl ProxyProbeConfig {
    /// Parsed probe timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string cannot be parsed
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout)
            .map_err(|e| anyhow::anyhow!("invalid proxy_probe.timeout '{}': {e}", self.timeout))
    }
}

impl Default for ProxyProbeConfig {
    fn default() -> Self {
        Self {
            url: default_probe_url(),
            timeout: default_probe_timeout(),
        }
    }
}

fn default_probe_url() -> Url {
    Url::parse("https://ipinfo.io/json").expect("valid default URL")
}

fn default_probe_timeout() -> String {
    "10s".to_string()
}
