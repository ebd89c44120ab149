use std::path::PathBuf;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Speech proxy errors with appropriate HTTP status codes
#[derive(Debug, Error)]
pub enum TtsError {
    /// The `key` query parameter is missing or empty
    #[error("Gemini API key is required. Please provide it in the `key` query parameter.")]
    MissingApiKey,

    /// The `proxy_url` header is not a usable URL
    #[error("Invalid proxy_url: {0}")]
    InvalidProxyUrl(String),

    /// The `proxy_url` scheme is neither HTTP(S) nor SOCKS
    #[error("Unsupported proxy protocol: {0}")]
    InvalidProxyProtocol(String),

    /// Invalid request body or headers
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request body is not JSON
    #[error("Unsupported Content-Type, expected: 'Content-Type: application/json'")]
    UnsupportedMediaType,

    /// Request body exceeds the limit
    #[error("Request body is too large, limit is {0} bytes")]
    PayloadTooLarge(usize),

    /// The upstream call failed or the upstream API answered with an error
    ///
    /// `status` is the upstream HTTP status when one was received.
    #[error("An error occurred while calling the Gemini API: {message}")]
    UpstreamTransport {
        status: Option<u16>,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The upstream answered successfully but without usable audio
    #[error("Failed to generate audio. The response from Gemini API was invalid: {reason}")]
    InvalidUpstreamResponse {
        reason: String,
        payload: serde_json::Value,
    },

    /// The generated audio could not be written to disk
    #[error("Failed to save audio to {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The proxy connectivity probe failed
    #[error("Proxy test failed: {0}")]
    ProxyProbe(String),

    /// Internal server error
    /// If Some(message), it can be shown
    /// If None, it should not leak details
    #[error("Internal server error")]
    InternalError(Option<String>),
}

impl TtsError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingApiKey => StatusCode::UNAUTHORIZED,
            Self::InvalidProxyUrl(_) | Self::InvalidProxyProtocol(_) | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UpstreamTransport { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::ProxyProbe(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidUpstreamResponse { .. } | Self::FileWrite { .. } | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type string for the response
    pub fn error_type(&self) -> &str {
        match self {
            Self::MissingApiKey => "authentication_error",
            Self::InvalidProxyUrl(_) | Self::InvalidProxyProtocol(_) => "invalid_proxy_error",
            Self::InvalidRequest(_) | Self::UnsupportedMediaType | Self::PayloadTooLarge(_) => {
                "invalid_request_error"
            }
            Self::UpstreamTransport { .. } | Self::InvalidUpstreamResponse { .. } => "api_error",
            Self::ProxyProbe(_) => "proxy_error",
            Self::FileWrite { .. } | Self::InternalError(_) => "internal_error",
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            Self::InternalError(Some(message)) => message.clone(),
            Self::InternalError(None) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Upstream diagnostic payload, if there is one
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            Self::UpstreamTransport { details, .. } => details.as_ref(),
            Self::InvalidUpstreamResponse { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    error: ErrorDetails<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorDetails<'a> {
    message: String,
    r#type: &'a str,
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a serde_json::Value>,
}

impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = ErrorResponse {
            error: ErrorDetails {
                message: self.client_message(),
                r#type: self.error_type(),
                code: status.as_u16(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}
