//! Per-request outbound proxy resolution
//!
//! The `proxy_url` header selects an HTTP(S) or SOCKS proxy for the upstream
//! call. Each resolved proxy gets its own `reqwest::Client`.

use reqwest::{Client, Proxy};
use url::Url;

use crate::error::TtsError;

/// Family of proxy protocols understood by the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyProtocol {
    /// `http://` and `https://` proxies, tunnelled with CONNECT
    Http,
    /// `socks4://`, `socks5://`, `socks5h://`, ...
    Socks,
}

impl ProxyProtocol {
    /// Classify a URL scheme by prefix
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        let scheme = scheme.to_ascii_lowercase();
        if scheme.starts_with("socks") {
            Some(Self::Socks)
        } else if scheme.starts_with("http") {
            Some(Self::Http)
        } else {
            None
        }
    }
}

/// A parsed and classified proxy URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    pub url: Url,
    pub protocol: ProxyProtocol,
}

impl ProxyTarget {
    /// Parse and classify a proxy URL
    ///
    /// # Errors
    ///
    /// `InvalidProxyUrl` for unparseable or host-less URLs,
    /// `InvalidProxyProtocol` for schemes other than HTTP(S) and SOCKS
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let url = Url::parse(raw.trim()).map_err(|e| TtsError::InvalidProxyUrl(format!("{raw}: {e}")))?;

        if url.host_str().is_none_or(str::is_empty) {
            return Err(TtsError::InvalidProxyUrl(format!("{raw}: missing host")));
        }

        let protocol = ProxyProtocol::from_scheme(url.scheme())
            .ok_or_else(|| TtsError::InvalidProxyProtocol(url.scheme().to_string()))?;

        Ok(Self { url, protocol })
    }

    /// Host and port for logging, without credentials
    pub fn display_address(&self) -> String {
        match (self.url.host_str(), self.url.port_or_known_default()) {
            (Some(host), Some(port)) => format!("{}://{host}:{port}", self.url.scheme()),
            (Some(host), None) => format!("{}://{host}", self.url.scheme()),
            _ => self.url.scheme().to_string(),
        }
    }
}

/// HTTP client that tunnels every request through one proxy
#[derive(Debug, Clone)]
pub struct ProxyConnector {
    target: ProxyTarget,
    client: Client,
}

impl ProxyConnector {
    /// Build a connector for a classified proxy
    ///
    /// # Errors
    ///
    /// `InvalidProxyProtocol` if reqwest does not support the scheme,
    /// `InternalError` if the client cannot be built
    pub fn new(target: ProxyTarget) -> crate::Result<Self> {
        let proxy = Proxy::all(target.url.as_str()).map_err(|e| {
            tracing::debug!(proxy = %target.display_address(), error = %e, "proxy rejected by HTTP client");
            TtsError::InvalidProxyProtocol(target.url.scheme().to_string())
        })?;

        let client = Client::builder().proxy(proxy).build().map_err(|e| {
            tracing::error!(error = %e, "failed to build proxied HTTP client");
            TtsError::InternalError(None)
        })?;

        Ok(Self { target, client })
    }

    pub const fn target(&self) -> &ProxyTarget {
        &self.target
    }

    pub const fn protocol(&self) -> ProxyProtocol {
        self.target.protocol
    }

    pub const fn client(&self) -> &Client {
        &self.client
    }
}

/// Turn the optional `proxy_url` header into a connector
///
/// `None` or a blank value means a direct connection.
///
/// # Errors
///
/// See [`ProxyTarget::parse`] and [`ProxyConnector::new`]
pub fn resolve_connector(proxy_url: Option<&str>) -> crate::Result<Option<ProxyConnector>> {
    let Some(raw) = proxy_url.map(str::trim).filter(|raw| !raw.is_empty()) else {
        tracing::debug!("no proxy given, connecting directly");
        return Ok(None);
    };

    let connector = ProxyConnector::new(ProxyTarget::parse(raw)?)?;
    tracing::info!(
        proxy = %connector.target().display_address(),
        protocol = ?connector.protocol(),
        "using proxy"
    );

    Ok(Some(connector))
}
