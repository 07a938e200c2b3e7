//! Layer descriptors as published by the dashboard's overlayer configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{WmsError, WmsResult};

/// The service hosting a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    /// Base endpoint of the service, e.g. `http://host/geoserver/ows`
    pub host: String,

    /// Human-readable datasource name
    #[serde(default)]
    pub name: Option<String>,
}

/// One map layer entry from the dashboard configuration.
///
/// Only the fields needed to reach the layer's capabilities are modelled;
/// the remaining keys of an overlayer record are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    /// Technical layer name in the source service
    pub name: String,

    /// Namespace the layer belongs to
    pub workspace: String,

    /// Query string that replaces the default GetCapabilities query when enabled
    #[serde(default)]
    pub capabilities_url: String,

    #[serde(default)]
    pub title: Option<String>,

    pub datasource: Datasource,
}

/// A descriptor file holds either a single overlayer record or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptorFile {
    Many(Vec<LayerDescriptor>),
    One(LayerDescriptor),
}

impl LayerDescriptor {
    pub fn new(
        name: impl Into<String>,
        workspace: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            workspace: workspace.into(),
            capabilities_url: String::new(),
            title: None,
            datasource: Datasource {
                host: host.into(),
                name: None,
            },
        }
    }

    /// `workspace:name`, the form used in WMS `LAYERS` parameters.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.workspace, self.name)
    }

    /// Parse one record or an array of records from JSON text.
    pub fn list_from_json(json: &str) -> WmsResult<Vec<Self>> {
        let parsed: DescriptorFile = serde_json::from_str(json)?;
        Ok(match parsed {
            DescriptorFile::Many(list) => list,
            DescriptorFile::One(one) => vec![one],
        })
    }

    /// Load descriptors from a JSON file.
    pub fn list_from_file(path: impl AsRef<Path>) -> WmsResult<Vec<Self>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| WmsError::Config(format!("{}: {}", path.display(), e)))?;
        Self::list_from_json(&content)
    }
}
