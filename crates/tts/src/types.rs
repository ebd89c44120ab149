use std::path::PathBuf;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Canonical speech request sent upstream
///
/// Produced by [`crate::normalize::normalize`]. Only `language_code` changes
/// afterwards, when the repair step substitutes a valid code.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    /// Text to synthesize into speech
    pub text: String,
    /// Prebuilt voice name (e.g. "Leda")
    pub voice_name: String,
    /// BCP-47 style code such as "pt-BR"
    pub language_code: Option<String>,
    /// Opaque audio settings forwarded untouched
    pub audio_config: Option<serde_json::Value>,
}

/// Audio as returned by the upstream, before decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAudio {
    /// Base64-encoded PCM samples
    pub data: String,
    /// MIME descriptor such as "audio/L16;rate=24000"
    pub mime_type: Option<String>,
}

/// Outcome of a successful `/generate-audio` call
#[derive(Debug)]
pub enum GeneratedAudio {
    /// WAV bytes streamed back as an attachment
    Attachment(Vec<u8>),
    /// WAV written to disk at this path
    Saved(PathBuf),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedResponse {
    success: bool,
    message: &'static str,
    file_path: String,
}

impl IntoResponse for GeneratedAudio {
    fn into_response(self) -> Response {
        match self {
            Self::Attachment(wav) => (
                [
                    (http::header::CONTENT_TYPE, "audio/wav"),
                    (http::header::CONTENT_DISPOSITION, "attachment; filename=\"audio.wav\""),
                ],
                wav,
            )
                .into_response(),
            Self::Saved(path) => Json(SavedResponse {
                success: true,
                message: "Audio saved successfully.",
                file_path: path.display().to_string(),
            })
            .into_response(),
        }
    }
}
