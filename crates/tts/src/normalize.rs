//! Client payload normalization
//!
//! Clients send either a convenience shape (`{"text": "...", "voice": "Kore"}`)
//! or the upstream Gemini shape (`contents` + `generationConfig`), or a mix.
//! Each output field is resolved with a fixed precedence:
//!
//! | field | convenience | upstream shape | default |
//! |---|---|---|---|
//! | text | `text` | `contents[0].parts[*].text` | [`DEFAULT_TEXT`] |
//! | voice | `voice`, `voiceName` | `generationConfig.speechConfig.voiceConfig.prebuiltVoiceConfig.voiceName` | [`DEFAULT_VOICE`] |
//! | language | `languageCode` | `generationConfig.speechConfig.languageCode` | omitted |
//! | audio config | `audioConfig` | `generationConfig.audioConfig` | omitted |
//!
//! Every field is read leniently: a value of the wrong JSON type counts as
//! absent instead of rejecting the request.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};

use crate::catalog::{DEFAULT_VOICE, is_known_voice};
use crate::types::SpeechRequest;

/// Text used when the client sends none
pub const DEFAULT_TEXT: &str = "No text provided.";

/// Loosely-shaped `/generate-audio` request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub voice: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub voice_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub language_code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub audio_config: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub contents: Option<Vec<ClientContent>>,
    #[serde(default, deserialize_with = "lenient")]
    pub generation_config: Option<ClientGenerationConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientContent {
    #[serde(default, deserialize_with = "lenient")]
    pub parts: Option<Vec<ClientPart>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientPart {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientGenerationConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub speech_config: Option<ClientSpeechConfig>,
    #[serde(default, deserialize_with = "lenient")]
    pub audio_config: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSpeechConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub voice_config: Option<ClientVoiceConfig>,
    #[serde(default, deserialize_with = "lenient")]
    pub language_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientVoiceConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub prebuilt_voice_config: Option<ClientPrebuiltVoiceConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPrebuiltVoiceConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub voice_name: Option<String>,
}

/// Deserialize any JSON value, keeping it only if it has the expected shape
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl ClientPayload {
    fn nested_text(&self) -> Option<&str> {
        self.contents
            .as_deref()?
            .first()?
            .parts
            .as_deref()?
            .iter()
            .find_map(|part| non_empty(part.text.as_deref()))
    }

    fn speech_config(&self) -> Option<&ClientSpeechConfig> {
        self.generation_config.as_ref()?.speech_config.as_ref()
    }

    fn nested_voice(&self) -> Option<&str> {
        let prebuilt = self
            .speech_config()?
            .voice_config
            .as_ref()?
            .prebuilt_voice_config
            .as_ref()?;
        non_empty(prebuilt.voice_name.as_deref())
    }

    fn nested_language_code(&self) -> Option<&str> {
        non_empty(self.speech_config()?.language_code.as_deref())
    }

    fn nested_audio_config(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.generation_config.as_ref()?.audio_config.as_ref()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolve a client payload into the canonical speech request
pub fn normalize(payload: &ClientPayload) -> SpeechRequest {
    let text = non_empty(payload.text.as_deref())
        .or_else(|| payload.nested_text())
        .unwrap_or(DEFAULT_TEXT);

    let voice_name = non_empty(payload.voice.as_deref())
        .or_else(|| non_empty(payload.voice_name.as_deref()))
        .or_else(|| payload.nested_voice())
        .unwrap_or(DEFAULT_VOICE);

    if !is_known_voice(voice_name) {
        tracing::warn!(voice = voice_name, "voice is not in the catalog, forwarding as is");
    }

    let language_code = non_empty(payload.language_code.as_deref())
        .or_else(|| payload.nested_language_code())
        .map(|code| code.trim().to_string());

    let audio_config = payload
        .audio_config
        .as_ref()
        .or_else(|| payload.nested_audio_config())
        .map(|config| serde_json::Value::Object(config.clone()));

    SpeechRequest {
        text: text.to_string(),
        voice_name: voice_name.to_string(),
        language_code,
        audio_config,
    }
}
