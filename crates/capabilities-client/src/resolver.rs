//! Resolve layer extents through the layer's GetCapabilities document.

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use wms_common::{GeographicBoundingBox, LayerDescriptor, TemporalDimension, WmsResult};
use wms_protocol::capabilities::has_layers;
use wms_protocol::{
    build_capabilities_url, extract_bounding_box, find_layer, layer_temporal_dimension,
    parse_capabilities, CapabilitiesDocument, CapabilitiesQuery,
};

use crate::config::ResolverConfig;
use crate::fetch::{CapabilitiesFetcher, HttpFetcher};
use crate::viewport::Viewport;

/// Everything a map needs about one layer's extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerExtent {
    /// Layer name from the descriptor
    pub layer: String,
    /// The capabilities URL that was queried
    pub url: String,
    pub bounds: Option<GeographicBoundingBox>,
    pub time: Option<TemporalDimension>,
    /// Why the time dimension could not be read; `time` is `None` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_error: Option<String>,
}

/// Stateless capabilities pipeline: build URL, fetch, parse, extract.
pub struct CapabilitiesBoundsResolver<F = HttpFetcher> {
    config: ResolverConfig,
    fetcher: F,
}

impl CapabilitiesBoundsResolver<HttpFetcher> {
    /// Resolver backed by a reqwest client built from `config`.
    pub fn new(config: ResolverConfig) -> WmsResult<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }
}

impl<F: CapabilitiesFetcher> CapabilitiesBoundsResolver<F> {
    pub fn with_fetcher(config: ResolverConfig, fetcher: F) -> WmsResult<Self> {
        config.validate()?;
        Ok(Self { config, fetcher })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The layer-scoped GetCapabilities URL for `descriptor`.
    pub fn capabilities_url(&self, descriptor: &LayerDescriptor) -> WmsResult<String> {
        let query = CapabilitiesQuery::for_descriptor(descriptor, self.config.honor_query_override);
        build_capabilities_url(descriptor, &self.config.anchor, query)
    }

    /// Fetch `url` and parse the body as a capabilities document.
    pub async fn fetch_and_parse(&self, url: &str) -> WmsResult<CapabilitiesDocument> {
        let body = self.fetcher.fetch_text(url).await?;
        let doc = parse_capabilities(&body)?;
        if !has_layers(&doc) {
            warn!(url = %url, root = %doc.root().name, "Capabilities document lists no layers");
        }
        Ok(doc)
    }

    /// Geographic bounding box of the descriptor's layer.
    ///
    /// `Ok(None)` means the layer or its extent is not advertised; callers
    /// should leave the viewport alone.
    #[instrument(skip(self, descriptor), fields(layer = %descriptor.name))]
    pub async fn resolve_bounds(
        &self,
        descriptor: &LayerDescriptor,
    ) -> WmsResult<Option<GeographicBoundingBox>> {
        let url = self.capabilities_url(descriptor)?;
        let doc = self.fetch_and_parse(&url).await?;
        let bounds = bounds_for(&doc, descriptor);
        if bounds.is_none() {
            warn!(url = %url, "No bounding box advertised for layer");
        }
        Ok(bounds)
    }

    /// Time dimension of the descriptor's layer, values ascending.
    #[instrument(skip(self, descriptor), fields(layer = %descriptor.name))]
    pub async fn resolve_time_dimension(
        &self,
        descriptor: &LayerDescriptor,
    ) -> WmsResult<Option<TemporalDimension>> {
        let url = self.capabilities_url(descriptor)?;
        let doc = self.fetch_and_parse(&url).await?;
        time_for(&doc, descriptor)
    }

    /// Bounds and time dimension from a single capabilities request.
    ///
    /// A time dimension that fails to parse is reported in
    /// [`LayerExtent::time_error`]; the bounds are still returned.
    #[instrument(skip(self, descriptor), fields(layer = %descriptor.name))]
    pub async fn resolve_extent(&self, descriptor: &LayerDescriptor) -> WmsResult<LayerExtent> {
        let url = self.capabilities_url(descriptor)?;
        let doc = self.fetch_and_parse(&url).await?;
        let bounds = bounds_for(&doc, descriptor);
        let (time, time_error) = match time_for(&doc, descriptor) {
            Ok(time) => (time, None),
            Err(e) => {
                warn!(error = %e, "Unreadable time dimension");
                (None, Some(e.to_string()))
            }
        };

        info!(
            has_bounds = bounds.is_some(),
            time_values = time.as_ref().map(|t| t.values.len()).unwrap_or(0),
            "Resolved layer extent"
        );

        Ok(LayerExtent {
            layer: descriptor.name.clone(),
            url,
            bounds,
            time,
            time_error,
        })
    }

    /// Resolve several layers concurrently. Results come back in input order;
    /// one failing layer does not affect the others.
    pub async fn resolve_all(&self, descriptors: &[LayerDescriptor]) -> Vec<WmsResult<LayerExtent>> {
        join_all(descriptors.iter().map(|d| self.resolve_extent(d))).await
    }

    /// Zoom `viewport` to the layer's extent.
    ///
    /// Returns `false`, leaving the viewport untouched, when no extent is advertised.
    pub async fn fit_layer_bounds<V: Viewport + ?Sized>(
        &self,
        descriptor: &LayerDescriptor,
        viewport: &mut V,
    ) -> WmsResult<bool> {
        match self.resolve_bounds(descriptor).await? {
            Some(bounds) => {
                viewport.fit_bounds(&bounds);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Layer-scoped services list bare names, global ones `workspace:name`.
fn bounds_for(doc: &CapabilitiesDocument, descriptor: &LayerDescriptor) -> Option<GeographicBoundingBox> {
    extract_bounding_box(doc, &descriptor.name)
        .or_else(|| extract_bounding_box(doc, &descriptor.qualified_name()))
}

fn time_for(
    doc: &CapabilitiesDocument,
    descriptor: &LayerDescriptor,
) -> WmsResult<Option<TemporalDimension>> {
    let qualified = descriptor.qualified_name();
    for name in [descriptor.name.as_str(), qualified.as_str()] {
        if find_layer(doc, name).is_some() {
            return layer_temporal_dimension(doc, name);
        }
    }

    debug!(layer = %descriptor.name, "Layer not listed, no time dimension");
    Ok(None)
}
