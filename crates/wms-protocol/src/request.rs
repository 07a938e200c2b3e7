//! GetCapabilities request construction.
//!
//! A datasource host points at the service-wide endpoint
//! (`http://host/geoserver/ows`). Capabilities are requested from the
//! layer-scoped virtual service instead (`http://host/geoserver/{workspace}/{name}/ows`),
//! which keeps the response down to the one layer of interest.

use wms_common::{LayerDescriptor, WmsError, WmsResult};

/// Endpoint segment replaced when scoping a host to a workspace and layer.
pub const DEFAULT_ANCHOR: &str = "ows";

/// Query string appended to every capabilities URL unless overridden.
pub const GET_CAPABILITIES_QUERY: &str = "REQUEST=GetCapabilities&VERSION=1.3.0&SERVICE=wms";

/// Which query string to append to the scoped endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapabilitiesQuery<'a> {
    /// `REQUEST=GetCapabilities&VERSION=1.3.0&SERVICE=wms`
    #[default]
    Standard,
    /// A caller-supplied query string, without the leading `?`
    Custom(&'a str),
}

impl<'a> CapabilitiesQuery<'a> {
    /// Pick the descriptor's `capabilitiesUrl` when overrides are honored and
    /// the field is set, the standard query otherwise.
    pub fn for_descriptor(descriptor: &'a LayerDescriptor, honor_override: bool) -> Self {
        let custom = descriptor.capabilities_url.trim().trim_start_matches('?');
        if honor_override && !custom.is_empty() {
            CapabilitiesQuery::Custom(custom)
        } else {
            CapabilitiesQuery::Standard
        }
    }

    pub fn as_str(&self) -> &'a str {
        match self {
            CapabilitiesQuery::Standard => GET_CAPABILITIES_QUERY,
            CapabilitiesQuery::Custom(q) => *q,
        }
    }
}

/// Build the layer-scoped GetCapabilities URL for a descriptor.
///
/// The last occurrence of `anchor` in the datasource host becomes
/// `{workspace}/{name}/{anchor}`. A host without the anchor is rejected.
///
/// The last occurrence is used rather than the first, so a hostname that
/// happens to contain the anchor (`http://shows.example.org/geoserver/ows`)
/// still has its endpoint segment scoped.
pub fn build_capabilities_url(
    descriptor: &LayerDescriptor,
    anchor: &str,
    query: CapabilitiesQuery<'_>,
) -> WmsResult<String> {
    if descriptor.workspace.trim().is_empty() {
        return Err(WmsError::MissingParameter("workspace".to_string()));
    }
    if descriptor.name.trim().is_empty() {
        return Err(WmsError::MissingParameter("name".to_string()));
    }
    if anchor.is_empty() {
        return Err(WmsError::Config("endpoint anchor must not be empty".to_string()));
    }

    let host = descriptor.datasource.host.as_str();
    let idx = host.rfind(anchor).ok_or_else(|| WmsError::MalformedHost {
        host: host.to_string(),
        anchor: anchor.to_string(),
    })?;

    let mut url = String::with_capacity(
        host.len() + descriptor.workspace.len() + descriptor.name.len() + 64,
    );
    url.push_str(&host[..idx]);
    url.push_str(&descriptor.workspace);
    url.push('/');
    url.push_str(&descriptor.name);
    url.push('/');
    url.push_str(anchor);
    url.push_str(&host[idx + anchor.len()..]);
    url.push('?');
    url.push_str(query.as_str());

    Ok(url)
}
