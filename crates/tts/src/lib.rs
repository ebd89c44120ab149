#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod catalog;
mod error;
mod http_client;
mod language;
mod mime;
mod normalize;
mod protocol;
mod provider;
mod proxy;
mod request;
mod server;
mod storage;
mod types;
mod wav;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};

pub use catalog::{LANGUAGES, LanguageEntry, VOICES, VoiceEntry};
pub use error::{Result, TtsError};
pub use normalize::ClientPayload;
pub use request::RequestContext;
pub use server::{Server, TtsServerBuilder};
pub use types::{GeneratedAudio, SpeechRequest};
use request::ExtractPayload;

/// Build the speech server from configuration
pub fn build_server(config: &voxgate_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TtsServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize speech server: {e}"))?,
    );
    tracing::debug!(provider = server.provider_name(), "speech endpoints ready");
    Ok(server)
}

/// Create the endpoint router for speech generation and the catalogs
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/generate-audio", post(generate_audio))
        .route("/test-proxy", post(test_proxy))
        .route("/languages", get(languages))
        .route("/voices", get(voices))
}

/// Handle speech generation requests
async fn generate_audio(
    State(server): State<Arc<Server>>,
    ExtractPayload(context, payload): ExtractPayload,
) -> Result<axum::response::Response> {
    tracing::debug!(
        proxied = context.proxy.is_present(),
        save_to_disk = context.save_to.is_some(),
        "generate-audio handler called"
    );

    let audio = server.generate_audio(&context, &payload).await?;

    tracing::debug!("audio generation complete");

    Ok(audio.into_response())
}

/// Report the exit address seen through a proxy
async fn test_proxy(State(server): State<Arc<Server>>, context: RequestContext) -> Result<Json<serde_json::Value>> {
    let body = server.test_proxy(&context.proxy).await?;
    Ok(Json(body))
}

async fn languages() -> Json<&'static [LanguageEntry]> {
    Json(LANGUAGES)
}

async fn voices() -> Json<&'static [VoiceEntry]> {
    Json(VOICES)
}
