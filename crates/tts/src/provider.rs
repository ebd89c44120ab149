pub mod gemini;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::{
    proxy::ProxyConnector,
    types::{RawAudio, SpeechRequest},
};

/// Per-request upstream call settings
#[derive(Debug, Clone, Copy)]
pub struct UpstreamContext<'a> {
    /// Caller-supplied upstream API key
    pub api_key: &'a SecretString,
    /// Proxy to tunnel through, `None` for a direct connection
    pub connector: Option<&'a ProxyConnector>,
}

/// Trait for upstream speech API implementations
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize text to raw audio
    async fn synthesize(&self, request: &SpeechRequest, upstream: UpstreamContext<'_>) -> crate::Result<RawAudio>;

    /// Answer a plain text prompt over a direct connection
    async fn generate_text(&self, prompt: &str, api_key: &SecretString) -> crate::Result<String>;

    /// Get the provider name
    fn name(&self) -> &str;
}
