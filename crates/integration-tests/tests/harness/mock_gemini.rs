//! Mock Gemini backend for integration tests
//!
//! Serves `models/{model}:generateContent` with canned audio or text. It also
//! answers plain forward-proxy requests for `/json`, so it can stand in for
//! an HTTP proxy in front of any probe or upstream host.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Canned behaviour of the mock
#[derive(Clone)]
pub struct MockBehavior {
    /// PCM bytes returned as inline audio
    pub pcm: Vec<u8>,
    /// `mimeType` of the inline audio, omitted when `None`
    pub mime_type: Option<String>,
    /// Answer of the text model
    pub text_answer: String,
    /// Accept text requests but never answer them
    pub stall_text: bool,
    /// Status and body returned for speech requests instead of audio
    pub speech_failure: Option<(u16, Value)>,
    /// Answer speech requests with a candidate that has no audio
    pub omit_audio: bool,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            pcm: vec![1, 0, 2, 0, 3, 0, 4, 0],
            mime_type: Some("audio/L16;codec=pcm;rate=24000".to_owned()),
            text_answer: "null".to_owned(),
            stall_text: false,
            speech_failure: None,
            omit_audio: false,
        }
    }
}

/// Mock Gemini backend that records what it receives
pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockGeminiState>,
}

struct MockGeminiState {
    behavior: MockBehavior,
    speech_count: AtomicU32,
    text_count: AtomicU32,
    probe_count: AtomicU32,
    last_speech_body: Mutex<Option<Value>>,
    last_api_key: Mutex<Option<String>>,
}

impl MockGemini {
    /// Start the mock with default behaviour
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(MockBehavior::default()).await
    }

    /// Start the mock with custom behaviour
    pub async fn start_with(behavior: MockBehavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockGeminiState {
            behavior,
            speech_count: AtomicU32::new(0),
            text_count: AtomicU32::new(0),
            probe_count: AtomicU32::new(0),
            last_speech_body: Mutex::new(None),
            last_api_key: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1beta/models/{model_action}", routing::post(handle_generate_content))
            .route("/json", routing::get(handle_probe))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the Gemini API
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// URL for using the mock as a forward HTTP proxy
    pub fn proxy_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of speech requests received
    pub fn speech_count(&self) -> u32 {
        self.state.speech_count.load(Ordering::Relaxed)
    }

    /// Number of text (language correction) requests received
    pub fn text_count(&self) -> u32 {
        self.state.text_count.load(Ordering::Relaxed)
    }

    /// Number of probe requests received
    pub fn probe_count(&self) -> u32 {
        self.state.probe_count.load(Ordering::Relaxed)
    }

    /// Body of the most recent speech request
    pub fn last_speech_body(&self) -> Option<Value> {
        self.state.last_speech_body.lock().unwrap().clone()
    }

    /// API key header of the most recent request
    pub fn last_api_key(&self) -> Option<String> {
        self.state.last_api_key.lock().unwrap().clone()
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate_content(
    State(state): State<Arc<MockGeminiState>>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !model_action.ends_with(":generateContent") {
        return (StatusCode::NOT_FOUND, "unknown action").into_response();
    }

    *state.last_api_key.lock().unwrap() = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);

    let is_speech = body["generationConfig"]["responseModalities"]
        .as_array()
        .is_some_and(|modalities| modalities.iter().any(|m| m == "AUDIO"));

    if !is_speech {
        state.text_count.fetch_add(1, Ordering::Relaxed);
        if state.behavior.stall_text {
            std::future::pending::<()>().await;
        }
        return Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": state.behavior.text_answer}]},
                "finishReason": "STOP"
            }]
        }))
        .into_response();
    }

    state.speech_count.fetch_add(1, Ordering::Relaxed);
    *state.last_speech_body.lock().unwrap() = Some(body);

    let behavior = &state.behavior;

    if let Some((status, body)) = &behavior.speech_failure {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(body.clone())).into_response();
    }

    if behavior.omit_audio {
        return Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "I cannot read that aloud."}]},
                "finishReason": "OTHER"
            }]
        }))
        .into_response();
    }

    let mut inline_data = json!({"data": STANDARD.encode(&behavior.pcm)});
    if let Some(mime_type) = &behavior.mime_type {
        inline_data["mimeType"] = json!(mime_type);
    }

    Json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"inlineData": inline_data}]},
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

async fn handle_probe(State(state): State<Arc<MockGeminiState>>, headers: HeaderMap) -> Json<Value> {
    state.probe_count.fetch_add(1, Ordering::Relaxed);

    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    Json(json!({"ip": "127.0.0.1", "host": host}))
}
