use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use secrecy::SecretString;
use url::Url;

use crate::{
    error::TtsError,
    language::{LanguageRepair, TextGenerator, repair_language_code},
    mime::AudioFormat,
    normalize::{ClientPayload, normalize},
    provider::{SpeechProvider, UpstreamContext, gemini::GeminiProvider},
    proxy::{ProxyConnector, ProxyTarget, resolve_connector},
    request::{ProxyHeader, RequestContext},
    storage::persist_audio,
    types::{GeneratedAudio, RawAudio},
    wav::{MAX_DATA_LEN, build_wav},
};

/// Speech proxy that turns client payloads into WAV audio
pub struct Server {
    provider: Box<dyn SpeechProvider>,
    probe_url: Url,
    probe_timeout: Duration,
    repair_timeout: Duration,
}

impl Server {
    /// Run one `/generate-audio` request end to end
    ///
    /// Steps run strictly in order and each remote call is attempted once:
    /// key check, normalization, language repair, proxy resolution, upstream
    /// synthesis, decoding, WAV assembly, then delivery.
    pub async fn generate_audio(
        &self,
        context: &RequestContext,
        payload: &ClientPayload,
    ) -> crate::Result<GeneratedAudio> {
        let api_key = context.require_api_key()?;

        let mut request = normalize(payload);

        let generator = ProviderTextGenerator {
            provider: self.provider.as_ref(),
            api_key,
            timeout: self.repair_timeout,
        };
        match repair_language_code(&mut request, &generator).await {
            LanguageRepair::Corrected { from, to } => {
                tracing::debug!(%from, %to, "continuing with corrected language code");
            }
            LanguageRepair::Unchanged { code } => {
                tracing::debug!(%code, "continuing with unsupported language code");
            }
            LanguageRepair::NotNeeded => {}
        }

        let connector = resolve_connector(context.proxy.value()?)?;

        let upstream = UpstreamContext {
            api_key,
            connector: connector.as_ref(),
        };
        let raw = self.provider.synthesize(&request, upstream).await?;

        let wav = decode_to_wav(raw)?;

        match &context.save_to {
            Some(target) => {
                let path = persist_audio(&target.dir, &target.file_name, &wav).await?;
                Ok(GeneratedAudio::Saved(path))
            }
            None => Ok(GeneratedAudio::Attachment(wav)),
        }
    }

    /// Fetch the probe endpoint through a caller-supplied proxy
    ///
    /// Returns the probe's JSON answer, which usually names the exit IP.
    pub async fn test_proxy(&self, proxy: &ProxyHeader) -> crate::Result<serde_json::Value> {
        let raw = proxy
            .value()?
            .ok_or_else(|| TtsError::InvalidRequest("the proxy_url header is required".to_string()))?;

        let connector = ProxyConnector::new(ProxyTarget::parse(raw)?)?;
        let proxy = connector.target().display_address();

        tracing::info!(%proxy, probe = %self.probe_url, "testing proxy");

        let response = connector
            .client()
            .get(self.probe_url.clone())
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%proxy, error = %e, "proxy probe failed");
                TtsError::ProxyProbe(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%proxy, %status, "proxy probe returned an error status");
            return Err(TtsError::ProxyProbe(format!("probe endpoint returned {status}")));
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TtsError::ProxyProbe(format!("probe endpoint did not return JSON: {e}")))?;

        tracing::info!(%proxy, "proxy probe succeeded");

        Ok(body)
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

/// Leading characters of undecodable audio data echoed back in error details
const DATA_PREFIX_CHARS: usize = 64;

/// Decode the upstream base64 PCM and wrap it in a WAV container
fn decode_to_wav(raw: RawAudio) -> crate::Result<Vec<u8>> {
    let data = raw.data.trim();
    let pcm = STANDARD.decode(data).map_err(|e| {
        tracing::error!(error = %e, data_len = data.len(), "upstream audio is not valid base64");
        let prefix: String = data.chars().take(DATA_PREFIX_CHARS).collect();
        TtsError::InvalidUpstreamResponse {
            reason: format!("audio data is not valid base64: {e}"),
            payload: serde_json::json!({
                "mimeType": raw.mime_type,
                "data": prefix,
                "dataLength": data.len(),
            }),
        }
    })?;

    if pcm.len() > MAX_DATA_LEN {
        return Err(TtsError::InvalidUpstreamResponse {
            reason: format!("audio data of {} bytes does not fit a WAV file", pcm.len()),
            payload: serde_json::json!({ "mimeType": raw.mime_type }),
        });
    }

    let format = AudioFormat::from_mime_type(raw.mime_type.as_deref());
    let wav = build_wav(&pcm, format);

    tracing::info!(
        mime_type = raw.mime_type.as_deref().unwrap_or("-"),
        sample_rate = format.sample_rate,
        bits_per_sample = format.bits_per_sample,
        pcm_bytes = pcm.len(),
        wav_bytes = wav.len(),
        "assembled WAV"
    );

    Ok(wav)
}

/// Routes language-code correction prompts to the provider's text model
///
/// The call is cut off after `timeout`; the caller then keeps the original code.
struct ProviderTextGenerator<'a> {
    provider: &'a dyn SpeechProvider,
    api_key: &'a SecretString,
    timeout: Duration,
}

#[async_trait]
impl TextGenerator for ProviderTextGenerator<'_> {
    async fn generate_text(&self, prompt: &str) -> crate::Result<String> {
        tokio::time::timeout(self.timeout, self.provider.generate_text(prompt, self.api_key))
            .await
            .map_err(|_| {
                tracing::warn!(timeout = ?self.timeout, "language code correction timed out");
                TtsError::UpstreamTransport {
                    status: None,
                    message: format!("language code correction timed out after {:?}", self.timeout),
                    details: None,
                }
            })?
    }
}

/// Builder for constructing the speech server from configuration
pub struct TtsServerBuilder<'a> {
    config: &'a voxgate_config::Config,
}

impl<'a> TtsServerBuilder<'a> {
    pub const fn new(config: &'a voxgate_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::Result<Server> {
        let probe_timeout = self
            .config
            .proxy_probe
            .timeout()
            .map_err(|e| TtsError::InternalError(Some(format!("invalid proxy probe timeout: {e}"))))?;

        let repair_timeout = self
            .config
            .gemini
            .repair_timeout()
            .map_err(|e| TtsError::InternalError(Some(format!("invalid language repair timeout: {e}"))))?;

        let provider = GeminiProvider::new(&self.config.gemini);

        tracing::debug!(
            base_url = %self.config.gemini.base_url,
            speech_model = %self.config.gemini.speech_model,
            text_model = %self.config.gemini.text_model,
            repair_timeout = ?repair_timeout,
            "speech server initialized"
        );

        Ok(Server {
            provider: Box::new(provider),
            probe_url: self.config.proxy_probe.url.clone(),
            probe_timeout,
            repair_timeout,
        })
    }
}
