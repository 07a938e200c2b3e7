//! Diagnostics for dashboard layer descriptors.
//!
//! Each report resolves the selected descriptors through
//! [`CapabilitiesBoundsResolver`] and renders the outcome as JSON. A layer
//! that fails is reported with its error instead of aborting the whole run.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use capabilities_client::{CapabilitiesBoundsResolver, LayerExtent, ResolverConfig};
use wms_common::{LayerDescriptor, WmsResult};
use wms_protocol::capabilities::layers;

pub mod logging;

/// Load descriptors from a JSON file and keep the one named `layer`, or all
/// of them when no name is given.
pub fn load_descriptors(path: &Path, layer: Option<&str>) -> Result<Vec<LayerDescriptor>> {
    let descriptors = LayerDescriptor::list_from_file(path)
        .with_context(|| format!("Failed to load layer descriptors from {}", path.display()))?;

    let selected: Vec<_> = match layer {
        Some(name) => descriptors
            .into_iter()
            .filter(|d| d.name == name || d.qualified_name() == name)
            .collect(),
        None => descriptors,
    };

    if selected.is_empty() {
        match layer {
            Some(name) => bail!("layer '{}' not found in {}", name, path.display()),
            None => bail!("no layer descriptors in {}", path.display()),
        }
    }
    Ok(selected)
}

/// Resolver configuration from an optional YAML file plus environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<ResolverConfig> {
    let config = match path {
        Some(path) => ResolverConfig::from_file(path)?,
        None => ResolverConfig::default(),
    };
    let config = config.with_env_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

#[derive(Serialize)]
struct Entry<T: Serialize> {
    layer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> Entry<T> {
    fn from_result(layer: &str, result: wms_common::WmsResult<T>) -> Self {
        match result {
            Ok(value) => Self {
                layer: layer.to_string(),
                result: Some(value),
                error: None,
            },
            Err(e) => Self {
                layer: layer.to_string(),
                result: None,
                error: Some(e.to_string()),
            },
        }
    }
}

fn to_value<T: Serialize>(entries: Vec<Entry<T>>) -> Result<Value> {
    serde_json::to_value(entries).context("Failed to serialize report")
}

/// Capabilities URL per layer. No network access.
pub fn url_report(
    resolver: &CapabilitiesBoundsResolver,
    descriptors: &[LayerDescriptor],
) -> Result<Value> {
    let entries = descriptors
        .iter()
        .map(|d| Entry::from_result(&d.name, resolver.capabilities_url(d)))
        .collect();
    to_value(entries)
}

/// `[[south, west], [north, east]]` per layer, `null` when not advertised.
pub async fn bounds_report(
    resolver: &CapabilitiesBoundsResolver,
    descriptors: &[LayerDescriptor],
) -> Result<Value> {
    let mut entries = Vec::with_capacity(descriptors.len());
    for d in descriptors {
        let bounds = resolver.resolve_bounds(d).await;
        entries.push(Entry::from_result(&d.name, bounds));
    }
    to_value(entries)
}

/// Sorted time values per layer.
pub async fn times_report(
    resolver: &CapabilitiesBoundsResolver,
    descriptors: &[LayerDescriptor],
) -> Result<Value> {
    let mut entries = Vec::with_capacity(descriptors.len());
    for d in descriptors {
        let time = resolver.resolve_time_dimension(d).await;
        entries.push(Entry::from_result(&d.name, time));
    }
    to_value(entries)
}

#[derive(Serialize)]
struct ExtentSummary {
    #[serde(flatten)]
    extent: LayerExtent,
    /// `[lon, lat]` of the bounds midpoint
    center: Option<(f64, f64)>,
    default_time: Option<DateTime<Utc>>,
}

impl ExtentSummary {
    fn new(extent: LayerExtent) -> WmsResult<Self> {
        let center = match &extent.bounds {
            Some(bounds) => Some(bounds.to_numeric()?.center()),
            None => None,
        };
        let default_time = match &extent.time {
            Some(time) => time.default_instant()?,
            None => None,
        };
        Ok(Self {
            extent,
            center,
            default_time,
        })
    }
}

/// Bounds and time together, layers resolved concurrently. Adds the bounds
/// center and the default instant of the time dimension.
pub async fn extent_report(
    resolver: &CapabilitiesBoundsResolver,
    descriptors: &[LayerDescriptor],
) -> Result<Value> {
    let results = resolver.resolve_all(descriptors).await;
    let entries = descriptors
        .iter()
        .zip(results)
        .map(|(d, r)| Entry::from_result(&d.name, r.and_then(ExtentSummary::new)))
        .collect();
    to_value(entries)
}

/// Names of every layer listed by each descriptor's capabilities document.
pub async fn layers_report(
    resolver: &CapabilitiesBoundsResolver,
    descriptors: &[LayerDescriptor],
) -> Result<Value> {
    let mut entries = Vec::with_capacity(descriptors.len());
    for d in descriptors {
        let names = match resolver.capabilities_url(d) {
            Ok(url) => resolver.fetch_and_parse(&url).await.map(|doc| {
                layers(&doc)
                    .into_iter()
                    .filter_map(|l| l.child_text("Name").map(str::to_string))
                    .collect::<Vec<_>>()
            }),
            Err(e) => Err(e),
        };
        entries.push(Entry::from_result(&d.name, names));
    }
    to_value(entries)
}
