//! Transport for capabilities documents.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, instrument};

use wms_common::{WmsError, WmsResult};

use crate::config::{ProxyMode, ResolverConfig};

/// Fetches the text body behind a URL.
///
/// One GET per call, no retry. Implementations report non-2xx responses as
/// [`WmsError::HttpStatus`].
#[async_trait]
pub trait CapabilitiesFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> WmsResult<String>;
}

/// reqwest-backed fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    /// Relay endpoint the target URL is passed to as `?url=`
    relay: Option<Url>,
}

impl HttpFetcher {
    /// Create a fetcher honoring the timeouts, user agent and proxy of `config`.
    pub fn new(config: &ResolverConfig) -> WmsResult<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone());

        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        // Only the configured proxy is used; HTTP_PROXY and friends are ignored.
        let mut relay = None;
        builder = match (&config.proxy, config.proxy_mode) {
            (Some(proxy), ProxyMode::Forward) => {
                let proxy = reqwest::Proxy::all(proxy.as_str())
                    .map_err(|e| WmsError::Config(format!("invalid proxy '{}': {}", proxy, e)))?;
                builder.proxy(proxy)
            }
            (Some(proxy), ProxyMode::Relay) => {
                let url = Url::parse(proxy)
                    .map_err(|e| WmsError::Config(format!("invalid proxy '{}': {}", proxy, e)))?;
                relay = Some(url);
                builder.no_proxy()
            }
            (None, _) => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| WmsError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, relay })
    }

    /// The URL actually requested for `url`: unchanged, or wrapped for the relay.
    pub fn request_url(&self, url: &str) -> String {
        match &self.relay {
            Some(relay) => {
                let mut wrapped = relay.clone();
                wrapped.query_pairs_mut().append_pair("url", url);
                wrapped.to_string()
            }
            None => url.to_string(),
        }
    }
}

#[async_trait]
impl CapabilitiesFetcher for HttpFetcher {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_text(&self, url: &str) -> WmsResult<String> {
        let request_url = self.request_url(url);
        let response = self
            .client
            .get(&request_url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WmsError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "Fetched capabilities");
        Ok(body)
    }
}

fn transport_error(err: reqwest::Error) -> WmsError {
    if err.is_timeout() {
        WmsError::Timeout
    } else {
        WmsError::Transport(err.to_string())
    }
}
