#![allow(clippy::must_use_candidate)]

mod env;
pub mod gemini;
pub mod health;
mod loader;
pub mod proxy;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use gemini::*;
pub use health::*;
pub use proxy::*;
pub use server::*;
pub use telemetry::*;

/// Top-level voxgate configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream Gemini API configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Proxy connectivity probe configuration
    #[serde(default)]
    pub proxy_probe: ProxyProbeConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
