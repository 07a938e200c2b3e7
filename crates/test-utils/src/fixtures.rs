//! Common test fixtures: capabilities documents as served by GeoServer and
//! the overlayer records that point at them.

use wms_common::LayerDescriptor;

/// Layer-scoped WMS 1.3.0 response for `prodes-amz/yearly_deforestation_2013_2018`.
///
/// One root layer wrapping the named layer, which carries an
/// `EX_GeographicBoundingBox` plus `CRS:84` and `EPSG:4674` `BoundingBox` entries.
pub const CAPABILITIES_PRODES: &str = include_str!("../testdata/capabilities_prodes.xml");

/// WMS 1.3.0 response with a single named layer directly under `Capability`.
pub const CAPABILITIES_FLAT: &str = include_str!("../testdata/capabilities_flat.xml");

/// WMS 1.3.0 response whose layer has an out-of-order `time` dimension.
pub const CAPABILITIES_TIME: &str = include_str!("../testdata/capabilities_time.xml");

/// WMS 1.1.1 response using `LatLonBoundingBox` and an `Extent` time list.
pub const CAPABILITIES_1_1_1: &str = include_str!("../testdata/capabilities_111.xml");

/// Overlayer record as exported by the dashboard configuration service.
pub const LAYER_CONFIG_PRODES: &str = include_str!("../testdata/layer_config_prodes.json");

/// Expected corners of the PRODES fixture layer.
pub const PRODES_CORNERS: [[&str; 2]; 2] = [
    ["-16.2779683090209", "-73.8538648282111"],
    ["5.20548191938395", "-44.0"],
];

pub const PRODES_LAYER: &str = "yearly_deforestation_2013_2018";
pub const FLAT_LAYER: &str = "accumulated_deforestation_2000";
pub const TIME_LAYER: &str = "temporal_mosaic_legal_amazon";
pub const LEGACY_LAYER: &str = "focos_ref_sat";

/// Descriptor for `layer` in the `prodes-amz` workspace, served from `host`.
///
/// `host` is typically a [`FixtureServer`](crate::FixtureServer) endpoint
/// ending in `/ows`.
pub fn descriptor(layer: &str, host: &str) -> LayerDescriptor {
    LayerDescriptor::new(layer, "prodes-amz", host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_capabilities_documents() {
        for doc in [CAPABILITIES_PRODES, CAPABILITIES_FLAT, CAPABILITIES_TIME] {
            assert!(doc.contains("<WMS_Capabilities version=\"1.3.0\""));
        }
        assert!(CAPABILITIES_1_1_1.contains("<WMT_MS_Capabilities version=\"1.1.1\""));
    }

    #[test]
    fn test_layer_config_fixture_parses() {
        let list = LayerDescriptor::list_from_json(LAYER_CONFIG_PRODES).unwrap();
        assert_eq!(list[0].name, PRODES_LAYER);
    }
}
