//! Resolver configuration.
//!
//! Loaded from YAML, with optional overrides from environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `CAPABILITIES_ANCHOR` | `anchor` |
//! | `CAPABILITIES_TIMEOUT_SECS` | `request_timeout_secs` |
//! | `CAPABILITIES_PROXY` | `proxy` |
//! | `CAPABILITIES_PROXY_MODE` | `proxy_mode` (`relay` or `forward`) |

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use wms_common::{WmsError, WmsResult};
use wms_protocol::DEFAULT_ANCHOR;

/// How [`ResolverConfig::proxy`] is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    /// URL-wrapping relay: `GET {proxy}?url={capabilities url}`, the way the
    /// dashboard reaches GeoServer hosts from the browser.
    #[default]
    Relay,
    /// Plain HTTP forward proxy.
    Forward,
}

impl std::str::FromStr for ProxyMode {
    type Err = WmsError;

    fn from_str(s: &str) -> WmsResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "relay" => Ok(ProxyMode::Relay),
            "forward" => Ok(ProxyMode::Forward),
            other => Err(WmsError::Config(format!(
                "unknown proxy mode '{}', expected relay or forward",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Endpoint segment of datasource hosts that gets scoped to workspace/layer
    pub anchor: String,
    /// Whole-request timeout. `None` leaves it to the transport.
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    /// Proxy for all capabilities requests, e.g. `http://terrabrasilis.dpi.inpe.br/proxy`
    pub proxy: Option<String>,
    pub proxy_mode: ProxyMode,
    /// Use a descriptor's `capabilitiesUrl` as the query string when set
    pub honor_query_override: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            anchor: DEFAULT_ANCHOR.to_string(),
            request_timeout_secs: None,
            connect_timeout_secs: 30,
            user_agent: concat!("capabilities-client/", env!("CARGO_PKG_VERSION")).to_string(),
            proxy: None,
            proxy_mode: ProxyMode::Relay,
            honor_query_override: false,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from a YAML file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> WmsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| WmsError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> WmsResult<Self> {
        serde_yaml::from_str(content).map_err(|e| WmsError::Config(e.to_string()))
    }

    /// Apply overrides from an environment lookup (usually `std::env::var`).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> WmsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(anchor) = lookup("CAPABILITIES_ANCHOR") {
            self.anchor = anchor;
        }
        if let Some(secs) = lookup("CAPABILITIES_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                WmsError::Config(format!("CAPABILITIES_TIMEOUT_SECS is not a number: '{}'", secs))
            })?;
            self.request_timeout_secs = Some(secs);
        }
        if let Some(proxy) = lookup("CAPABILITIES_PROXY") {
            self.proxy = if proxy.trim().is_empty() { None } else { Some(proxy) };
        }
        if let Some(mode) = lookup("CAPABILITIES_PROXY_MODE") {
            self.proxy_mode = mode.parse()?;
        }
        Ok(self)
    }

    /// Validate configuration.
    pub fn validate(&self) -> WmsResult<()> {
        if self.anchor.is_empty() {
            return Err(WmsError::Config("anchor must not be empty".to_string()));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(WmsError::Config("request_timeout_secs must be > 0".to_string()));
        }
        if self.connect_timeout_secs == 0 {
            return Err(WmsError::Config("connect_timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
