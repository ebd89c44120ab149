use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Default Gemini Generative Language API base URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for speech synthesis
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Model used for language-code correction
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";

/// Upstream Gemini API configuration
///
/// No API key lives here; every request carries its own.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Base URL override, e.g. for a compatible gateway
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Model that turns text into audio
    #[serde(default = "default_speech_model")]
    pub speech_model: String,
    /// Model asked to suggest a valid language code
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Upper bound for the language-code correction call, e.g. "10s"
    #[serde(default = "default_repair_timeout")]
    pub repair_timeout: String,
}

impl GeminiConfig {
    /// Parsed language-code correction timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the duration string cannot be parsed
    pub fn repair_timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.repair_timeout)
            .map_err(|e| anyhow::anyhow!("invalid gemini.repair_timeout '{}': {e}", self.repair_timeout))
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            speech_model: default_speech_model(),
            text_model: default_text_model(),
            repair_timeout: default_repair_timeout(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_GEMINI_BASE_URL).expect("valid default URL")
}

fn default_speech_model() -> String {
    DEFAULT_SPEECH_MODEL.to_string()
}

fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

fn default_repair_timeout() -> String {
    "10s".to_string()
}
