use std::path::PathBuf;

use axum::{body::Body, extract::FromRequestParts};
use secrecy::SecretString;

use crate::{error::TtsError, normalize::ClientPayload};

/// Query parameter carrying the caller's upstream API key
const API_KEY_QUERY_PARAM: &str = "key";

/// Header naming an outbound proxy for the upstream call
pub const PROXY_URL_HEADER: &str = "proxy_url";

/// Header naming the directory the WAV is saved to
pub const SAVE_TO_PATH_HEADER: &str = "save_to_path";

/// Header naming the saved file
pub const FILE_NAME_HEADER: &str = "file_name";

/// Body limit for speech requests (10 MiB)
const BODY_LIMIT_BYTES: usize = 10 << 20;

/// Where to persist the generated audio instead of returning it
///
/// Both values come straight from the `save_to_path` and `file_name` headers
/// and are used as given: no sandboxing or traversal checks are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    pub dir: PathBuf,
    pub file_name: String,
}

/// State of the `proxy_url` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProxyHeader {
    /// Absent or blank: connect directly
    #[default]
    Absent,
    /// Trimmed header value
    Present(String),
    /// Present but not valid UTF-8
    Undecodable,
}

impl ProxyHeader {
    /// The proxy URL to use, `None` for a direct connection
    ///
    /// # Errors
    ///
    /// `InvalidProxyUrl` when the header could not be decoded
    pub fn value(&self) -> crate::Result<Option<&str>> {
        match self {
            Self::Absent => Ok(None),
            Self::Present(raw) => Ok(Some(raw)),
            Self::Undecodable => Err(TtsError::InvalidProxyUrl(
                "header value is not valid UTF-8".to_string(),
            )),
        }
    }

    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

/// Per-request metadata taken from the query string and headers
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Upstream API key from `?key=`
    pub api_key: Option<SecretString>,
    /// The `proxy_url` header
    pub proxy: ProxyHeader,
    /// Present only when both `save_to_path` and `file_name` are set
    pub save_to: Option<SaveTarget>,
}

impl RequestContext {
    /// Build the context from request parts
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        let api_key = parts.uri.query().and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(name, _)| name == API_KEY_QUERY_PARAM)
                .map(|(_, value)| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(SecretString::from)
        });

        let save_to = match (
            decoded_header(parts, SAVE_TO_PATH_HEADER),
            decoded_header(parts, FILE_NAME_HEADER),
        ) {
            (Some(dir), Some(file_name)) => Some(SaveTarget {
                dir: PathBuf::from(dir),
                file_name,
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("only one of save_to_path and file_name given, returning audio in the response");
                None
            }
            (None, None) => None,
        };

        let proxy = match header(parts, PROXY_URL_HEADER) {
            Ok(Some(raw)) => ProxyHeader::Present(raw),
            Ok(None) => ProxyHeader::Absent,
            Err(e) => {
                tracing::warn!(error = %e, "proxy_url header is not valid UTF-8");
                ProxyHeader::Undecodable
            }
        };

        Self {
            api_key,
            proxy,
            save_to,
        }
    }

    /// The API key, or `MissingApiKey`
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when `?key=` was absent or empty
    pub fn require_api_key(&self) -> crate::Result<&SecretString> {
        self.api_key.as_ref().ok_or(TtsError::MissingApiKey)
    }
}

/// Non-empty header value, or the decoding error if it is not UTF-8
fn header(parts: &http::request::Parts, name: &str) -> Result<Option<String>, std::str::Utf8Error> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };

    let value = std::str::from_utf8(value.as_bytes())?.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Like [`header`], treating an undecodable value as absent
fn decoded_header(parts: &http::request::Parts, name: &str) -> Option<String> {
    header(parts, name).unwrap_or_else(|e| {
        tracing::warn!(header = name, error = %e, "ignoring header that is not valid UTF-8");
        None
    })
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut http::request::Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// Extractor for the `/generate-audio` body together with its context
pub struct ExtractPayload(pub RequestContext, pub ClientPayload);

fn is_json(parts: &http::request::Parts) -> bool {
    parts
        .headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| {
            let essence = essence.trim();
            essence.eq_ignore_ascii_case("application/json")
                || essence.to_ascii_lowercase().ends_with("+json")
        })
}

impl<S> axum::extract::FromRequest<S> for ExtractPayload
where
    S: Send + Sync,
{
    type Rejection = TtsError;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();
        let context = RequestContext::from_parts(&parts);

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err)
                .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
            {
                TtsError::PayloadTooLarge(BODY_LIMIT_BYTES)
            } else {
                TtsError::InvalidRequest(format!("Failed to read request body: {err}"))
            }
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(context, ClientPayload::default()));
        }

        if !is_json(&parts) {
            return Err(TtsError::UnsupportedMediaType);
        }

        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| TtsError::InvalidRequest(format!("Failed to parse request body: {e}")))?;

        if !value.is_object() {
            return Err(TtsError::InvalidRequest("Request body must be a JSON object".to_string()));
        }

        let payload = serde_json::from_value(value)
            .map_err(|e| TtsError::InvalidRequest(format!("Failed to parse request body: {e}")))?;

        Ok(Self(context, payload))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> http::request::Parts {
        let mut builder = http::Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn reads_key_from_query() {
        let context = RequestContext::from_parts(&parts("/generate-audio?foo=1&key=abc%2B1", &[]));
        assert_eq!(context.require_api_key().unwrap().expose_secret(), "abc+1");
    }

    #[test]
    fn missing_or_empty_key_is_rejected() {
        for uri in ["/generate-audio", "/generate-audio?key=", "/generate-audio?other=x"] {
            let context = RequestContext::from_parts(&parts(uri, &[]));
            assert!(matches!(context.require_api_key(), Err(TtsError::MissingApiKey)), "{uri}");
        }
    }

    #[test]
    fn save_target_needs_both_headers() {
        let both = RequestContext::from_parts(&parts(
            "/generate-audio",
            &[("save_to_path", "/tmp/out"), ("file_name", "clip")],
        ));
        assert_eq!(
            both.save_to,
            Some(SaveTarget {
                dir: PathBuf::from("/tmp/out"),
                file_name: "clip".to_string()
            })
        );

        let only_dir = RequestContext::from_parts(&parts("/generate-audio", &[("save_to_path", "/tmp/out")]));
        assert_eq!(only_dir.save_to, None);
    }

    #[test]
    fn proxy_header_is_trimmed() {
        let context = RequestContext::from_parts(&parts("/", &[("proxy_url", " socks5://h:1080 ")]));
        assert_eq!(context.proxy, ProxyHeader::Present("socks5://h:1080".to_string()));
        assert_eq!(context.proxy.value().unwrap(), Some("socks5://h:1080"));
    }

    #[test]
    fn blank_proxy_header_means_direct() {
        let context = RequestContext::from_parts(&parts("/", &[("proxy_url", "   ")]));
        assert_eq!(context.proxy, ProxyHeader::Absent);
        assert_eq!(context.proxy.value().unwrap(), None);
    }

    #[test]
    fn non_utf8_proxy_header_is_invalid_not_direct() {
        let value = http::HeaderValue::from_bytes(b"socks5://h\xff:1080").unwrap();
        let request = http::Request::builder()
            .uri("/generate-audio?key=k")
            .header("proxy_url", value)
            .body(())
            .unwrap();

        let context = RequestContext::from_parts(&request.into_parts().0);

        assert_eq!(context.proxy, ProxyHeader::Undecodable);
        assert!(context.proxy.is_present());
        assert!(matches!(context.proxy.value(), Err(TtsError::InvalidProxyUrl(_))));
    }

    #[test]
    fn non_utf8_save_header_falls_back_to_attachment() {
        let request = http::Request::builder()
            .uri("/generate-audio")
            .header("save_to_path", http::HeaderValue::from_bytes(b"/tmp/\xff").unwrap())
            .header("file_name", "clip")
            .body(())
            .unwrap();

        let context = RequestContext::from_parts(&request.into_parts().0);

        assert_eq!(context.save_to, None);
    }

    #[test]
    fn json_content_types() {
        assert!(is_json(&parts("/", &[("content-type", "application/json")])));
        assert!(is_json(&parts("/", &[("content-type", "application/json; charset=utf-8")])));
        assert!(is_json(&parts("/", &[("content-type", "application/vnd.api+json")])));
        assert!(!is_json(&parts("/", &[("content-type", "text/plain")])));
        assert!(!is_json(&parts("/", &[])));
    }
}
