//! Gemini Generative Language API provider

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;
use voxgate_config::GeminiConfig;

use super::{SpeechProvider, UpstreamContext};
use crate::{
    error::TtsError,
    http_client::http_client,
    protocol::{GeminiErrorEnvelope, GeminiRequest, GeminiResponse},
    proxy::ProxyConnector,
    types::{RawAudio, SpeechRequest},
};

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider for speech synthesis and language-code correction
pub struct GeminiProvider {
    client: Client,
    base_url: Url,
    speech_model: String,
    text_model: String,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            client: http_client(),
            base_url: config.base_url.clone(),
            speech_model: config.speech_model.clone(),
            text_model: config.text_model.clone(),
        }
    }

    /// Build the `generateContent` endpoint URL for a model
    fn generate_url(&self, model: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/models/{model}:generateContent")
    }

    /// POST a `generateContent` request and return the raw JSON answer
    async fn generate_content(
        &self,
        client: &Client,
        model: &str,
        api_key: &SecretString,
        body: &GeminiRequest,
    ) -> crate::Result<serde_json::Value> {
        let url = self.generate_url(model);

        let response = client
            .post(&url)
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model, error = %e, "Gemini request failed");
                TtsError::UpstreamTransport {
                    status: e.status().map(|s| s.as_u16()),
                    message: e.to_string(),
                    details: None,
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!(model, error = %e, "failed to read Gemini response body");
            TtsError::UpstreamTransport {
                status: Some(status.as_u16()),
                message: format!("failed to read response body: {e}"),
                details: None,
            }
        })?;

        if !status.is_success() {
            tracing::error!(model, %status, body = %text, "Gemini API returned an error");

            return Err(TtsError::UpstreamTransport {
                status: Some(status.as_u16()),
                message: format!("Gemini API returned {status}"),
                details: error_details(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| TtsError::InvalidUpstreamResponse {
            reason: format!("response is not JSON: {e}"),
            payload: serde_json::Value::String(text),
        })
    }
}

/// Prefer the `error` object of a Google error envelope, else the raw body
fn error_details(body: &str) -> Option<serde_json::Value> {
    if body.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => Some(
            serde_json::from_value::<GeminiErrorEnvelope>(value.clone())
                .map_or(value, |envelope| envelope.error),
        ),
        Err(_) => Some(serde_json::Value::String(body.to_string())),
    }
}

#[async_trait]
impl SpeechProvider for GeminiProvider {
    async fn synthesize(&self, request: &SpeechRequest, upstream: UpstreamContext<'_>) -> crate::Result<RawAudio> {
        let client = upstream.connector.map_or(&self.client, ProxyConnector::client);

        tracing::info!(
            model = %self.speech_model,
            voice = %request.voice_name,
            language_code = request.language_code.as_deref().unwrap_or("-"),
            text_len = request.text.len(),
            proxied = upstream.connector.is_some(),
            "sending speech request to Gemini"
        );

        let body = GeminiRequest::from(request);
        let payload = self
            .generate_content(client, &self.speech_model, upstream.api_key, &body)
            .await?;

        let response: GeminiResponse = match serde_json::from_value(payload.clone()) {
            Ok(response) => response,
            Err(e) => {
                return Err(TtsError::InvalidUpstreamResponse {
                    reason: format!("unexpected response shape: {e}"),
                    payload,
                });
            }
        };

        response.inline_audio().ok_or_else(|| {
            tracing::error!(
                finish_reason = response.finish_reason().unwrap_or("-"),
                %payload,
                "Gemini response did not contain inline audio"
            );
            TtsError::InvalidUpstreamResponse {
                reason: "no inline audio data in response".to_string(),
                payload,
            }
        })
    }

    async fn generate_text(&self, prompt: &str, api_key: &SecretString) -> crate::Result<String> {
        let body = GeminiRequest::text_prompt(prompt);
        let payload = self.generate_content(&self.client, &self.text_model, api_key, &body).await?;

        serde_json::from_value::<GeminiResponse>(payload.clone())
            .ok()
            .and_then(|response| response.text())
            .ok_or_else(|| TtsError::InvalidUpstreamResponse {
                reason: "no text in response".to_string(),
                payload,
            })
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
