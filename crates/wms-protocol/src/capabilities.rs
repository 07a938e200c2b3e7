//! Layer lookups on a parsed capabilities document.
//!
//! Layers are read from `WMS_Capabilities/Capability/Layer` (or the WMS 1.1.1
//! `WMT_MS_Capabilities` root). Layer-scoped endpoints usually answer with a
//! root layer wrapping one named child, but a flat single layer directly under
//! `Capability` and nested layer groups are handled the same way.

use wms_common::time::sort_dates;
use wms_common::{GeographicBoundingBox, TemporalDimension, WmsResult};

use crate::xml::{CapabilitiesDocument, Element};

/// Geographic CRS codes that can stand in for `EX_GeographicBoundingBox`,
/// in order of preference. `CRS:84` is longitude first; the EPSG codes are
/// latitude first under WMS 1.3.0 `CRS=` and longitude first under 1.1.1 `SRS=`.
const GEOGRAPHIC_CRS: &[(&str, AxisOrder)] = &[
    ("CRS:84", AxisOrder::LonLat),
    ("EPSG:4326", AxisOrder::LatLon),
    ("EPSG:4674", AxisOrder::LatLon),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisOrder {
    LonLat,
    LatLon,
}

/// Which attribute named the reference system of a `<BoundingBox>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsAttribute {
    /// WMS 1.3.0 `CRS`, EPSG axis order applies
    Crs,
    /// WMS 1.1.1 `SRS`, always x = longitude
    Srs,
}

/// A `<BoundingBox>` entry tied to a coordinate reference system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrsBoundingBox {
    pub crs: String,
    pub attribute: CrsAttribute,
    pub minx: String,
    pub miny: String,
    pub maxx: String,
    pub maxy: String,
}

impl CrsBoundingBox {
    fn from_element(el: &Element) -> Option<Self> {
        let (crs, attribute) = match el.attr("CRS") {
            Some(crs) => (crs, CrsAttribute::Crs),
            None => (el.attr("SRS")?, CrsAttribute::Srs),
        };
        Some(Self {
            crs: crs.to_string(),
            attribute,
            minx: el.attr("minx")?.to_string(),
            miny: el.attr("miny")?.to_string(),
            maxx: el.attr("maxx")?.to_string(),
            maxy: el.attr("maxy")?.to_string(),
        })
    }
}

/// The ways a layer advertises its extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundingBoxShape {
    /// `EX_GeographicBoundingBox` (WMS 1.3.0) or `LatLonBoundingBox` (1.1.1)
    Geographic {
        west: String,
        east: String,
        south: String,
        north: String,
    },
    /// One `BoundingBox` per supported CRS
    CrsList(Vec<CrsBoundingBox>),
}

impl BoundingBoxShape {
    /// Read the extent carried by an element, preferring the geographic form.
    pub fn from_element(el: &Element) -> Option<Self> {
        if let Some(ex) = el.child("EX_GeographicBoundingBox") {
            return Some(BoundingBoxShape::Geographic {
                west: ex.child_text("westBoundLongitude")?.to_string(),
                east: ex.child_text("eastBoundLongitude")?.to_string(),
                south: ex.child_text("southBoundLatitude")?.to_string(),
                north: ex.child_text("northBoundLatitude")?.to_string(),
            });
        }

        if let Some(ll) = el.child("LatLonBoundingBox") {
            return Some(BoundingBoxShape::Geographic {
                west: ll.attr("minx")?.to_string(),
                east: ll.attr("maxx")?.to_string(),
                south: ll.attr("miny")?.to_string(),
                north: ll.attr("maxy")?.to_string(),
            });
        }

        let boxes: Vec<CrsBoundingBox> = el
            .children("BoundingBox")
            .iter()
            .filter_map(CrsBoundingBox::from_element)
            .collect();
        if boxes.is_empty() {
            None
        } else {
            Some(BoundingBoxShape::CrsList(boxes))
        }
    }

    /// Normalize to south/west/north/east. A CRS list without any geographic
    /// CRS yields `None`.
    pub fn to_geographic(&self) -> Option<GeographicBoundingBox> {
        match self {
            BoundingBoxShape::Geographic {
                west,
                east,
                south,
                north,
            } => Some(GeographicBoundingBox::new(
                south.as_str(),
                west.as_str(),
                north.as_str(),
                east.as_str(),
            )),
            BoundingBoxShape::CrsList(boxes) => {
                GEOGRAPHIC_CRS.iter().find_map(|(code, order)| {
                    let b = boxes.iter().find(|b| b.crs.eq_ignore_ascii_case(code))?;
                    let order = match b.attribute {
                        CrsAttribute::Crs => *order,
                        CrsAttribute::Srs => AxisOrder::LonLat,
                    };
                    Some(match order {
                        AxisOrder::LonLat => GeographicBoundingBox::new(
                            b.miny.as_str(),
                            b.minx.as_str(),
                            b.maxy.as_str(),
                            b.maxx.as_str(),
                        ),
                        AxisOrder::LatLon => GeographicBoundingBox::new(
                            b.minx.as_str(),
                            b.miny.as_str(),
                            b.maxx.as_str(),
                            b.maxy.as_str(),
                        ),
                    })
                })
            }
        }
    }
}

/// The top-level `Layer` under `Capability`, if any.
fn root_layer(doc: &CapabilitiesDocument) -> Option<&Element> {
    doc.root().path(&["Capability", "Layer"])
}

/// Every layer in the document, depth first in document order.
pub fn layers(doc: &CapabilitiesDocument) -> Vec<&Element> {
    fn walk<'a>(layer: &'a Element, out: &mut Vec<&'a Element>) {
        out.push(layer);
        for child in layer.children("Layer") {
            walk(child, out);
        }
    }

    let mut out = Vec::new();
    if let Some(capability) = doc.root().child("Capability") {
        for layer in capability.children("Layer") {
            walk(layer, &mut out);
        }
    }
    out
}

/// First layer whose `Name` equals `layer_name`.
pub fn find_layer<'a>(doc: &'a CapabilitiesDocument, layer_name: &str) -> Option<&'a Element> {
    layers(doc)
        .into_iter()
        .find(|layer| layer.child_text("Name") == Some(layer_name))
}

/// Extent of any element carrying `EX_GeographicBoundingBox` or `BoundingBox`
/// children.
pub fn bounding_box_of(element: &Element) -> Option<GeographicBoundingBox> {
    BoundingBoxShape::from_element(element)?.to_geographic()
}

/// Geographic bounding box of the named layer. `None` when the layer is
/// missing or advertises no usable extent.
pub fn extract_bounding_box(
    doc: &CapabilitiesDocument,
    layer_name: &str,
) -> Option<GeographicBoundingBox> {
    bounding_box_of(find_layer(doc, layer_name)?)
}

/// The `time` dimension element of a layer.
fn time_dimension_element(layer: &Element) -> Option<&Element> {
    let is_time = |el: &&Element| {
        el.attr("name")
            .map(|n| n.eq_ignore_ascii_case("time"))
            .unwrap_or(false)
    };
    layer
        .children("Dimension")
        .iter()
        .find(is_time)
        .filter(|d| d.text().is_some())
        .or_else(|| layer.children("Extent").iter().find(is_time))
}

fn temporal_dimension_of(layer: &Element) -> WmsResult<Option<TemporalDimension>> {
    let Some(dim) = time_dimension_element(layer) else {
        return Ok(None);
    };
    let Some(values) = dim.text() else {
        return Ok(None);
    };

    Ok(Some(TemporalDimension {
        name: dim.attr("name").unwrap_or("time").to_string(),
        units: dim.attr("units").map(str::to_string),
        default: dim.attr("default").map(str::to_string),
        values: sort_dates(values)?,
    }))
}

/// Time dimension of the named layer.
pub fn layer_temporal_dimension(
    doc: &CapabilitiesDocument,
    layer_name: &str,
) -> WmsResult<Option<TemporalDimension>> {
    match find_layer(doc, layer_name) {
        Some(layer) => temporal_dimension_of(layer),
        None => Ok(None),
    }
}

/// Time dimension of a layer-scoped document: the first layer that declares
/// one, searched depth first.
pub fn extract_temporal_dimension(
    doc: &CapabilitiesDocument,
) -> WmsResult<Option<TemporalDimension>> {
    let Some(layer) = layers(doc)
        .into_iter()
        .find(|l| time_dimension_element(l).and_then(Element::text).is_some())
    else {
        return Ok(None);
    };
    temporal_dimension_of(layer)
}

/// Whether the document's top-level layer exists at all.
pub fn has_layers(doc: &CapabilitiesDocument) -> bool {
    root_layer(doc).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_capabilities;
    use chrono::Datelike;

    fn geographic_fixture() -> Element {
        Element::new("Layer").with_child(
            Element::new("EX_GeographicBoundingBox")
                .with_child(Element::new("westBoundLongitude").with_text("-73.9909438636055"))
                .with_child(Element::new("eastBoundLongitude").with_text("-43.0169133104806"))
                .with_child(Element::new("southBoundLatitude").with_text("-16.290519038121"))
                .with_child(Element::new("northBoundLatitude").with_text("5.27215639335258")),
        )
    }

    #[test]
    fn test_standalone_geographic_structure() {
        let bbox = bounding_box_of(&geographic_fixture()).unwrap();
        assert_eq!(
            bbox.corners(),
            [
                ["-16.290519038121", "-73.9909438636055"],
                ["5.27215639335258", "-43.0169133104806"]
            ]
        );
    }

    #[test]
    fn test_crs_list_shape() {
        let layer = Element::new("Layer")
            .with_child(
                Element::new("BoundingBox")
                    .with_attribute("CRS", "CRS:84")
                    .with_attribute("minx", "-73.8538648282111")
                    .with_attribute("miny", "-16.2779683090209")
                    .with_attribute("maxx", "-44.0")
                    .with_attribute("maxy", "5.20548191938395"),
            )
            .with_child(
                Element::new("BoundingBox")
                    .with_attribute("CRS", "EPSG:4674")
                    .with_attribute("minx", "-16.2779683090209")
                    .with_attribute("miny", "-73.8538648282111")
                    .with_attribute("maxx", "5.20548191938395")
                    .with_attribute("maxy", "-44.0"),
            );

        let shape = BoundingBoxShape::from_element(&layer).unwrap();
        assert!(matches!(&shape, BoundingBoxShape::CrsList(b) if b.len() == 2));
        let bbox = shape.to_geographic().unwrap();
        assert_eq!(
            bbox.corners(),
            [
                ["-16.2779683090209", "-73.8538648282111"],
                ["5.20548191938395", "-44.0"]
            ]
        );
    }

    #[test]
    fn test_lat_lon_epsg_only() {
        let layer = Element::new("Layer").with_child(
            Element::new("BoundingBox")
                .with_attribute("CRS", "EPSG:4674")
                .with_attribute("minx", "-16.2779683090209")
                .with_attribute("miny", "-73.8538648282111")
                .with_attribute("maxx", "5.20548191938395")
                .with_attribute("maxy", "-44.0"),
        );
        let bbox = bounding_box_of(&layer).unwrap();
        assert_eq!(bbox.west, "-73.8538648282111");
        assert_eq!(bbox.south, "-16.2779683090209");
    }

    #[test]
    fn test_srs_epsg_4326_is_lon_lat() {
        let layer = Element::new("Layer").with_child(
            Element::new("BoundingBox")
                .with_attribute("SRS", "EPSG:4326")
                .with_attribute("minx", "-73.85")
                .with_attribute("miny", "-16.27")
                .with_attribute("maxx", "-44.0")
                .with_attribute("maxy", "5.20"),
        );
        let shape = BoundingBoxShape::from_element(&layer).unwrap();
        assert!(matches!(
            &shape,
            BoundingBoxShape::CrsList(b) if b[0].attribute == CrsAttribute::Srs
        ));
        assert_eq!(
            shape.to_geographic().unwrap().corners(),
            [["-16.27", "-73.85"], ["5.20", "-44.0"]]
        );
    }

    #[test]
    fn test_projected_only_has_no_bounds() {
        let layer = Element::new("Layer").with_child(
            Element::new("BoundingBox")
                .with_attribute("CRS", "EPSG:3857")
                .with_attribute("minx", "-8221000")
                .with_attribute("miny", "-1837000")
                .with_attribute("maxx", "-4898000")
                .with_attribute("maxy", "580000"),
        );
        assert!(bounding_box_of(&layer).is_none());
    }

    #[test]
    fn test_geographic_preferred_over_crs_list() {
        let layer = geographic_fixture().with_child(
            Element::new("BoundingBox")
                .with_attribute("CRS", "CRS:84")
                .with_attribute("minx", "0")
                .with_attribute("miny", "0")
                .with_attribute("maxx", "1")
                .with_attribute("maxy", "1"),
        );
        assert_eq!(bounding_box_of(&layer).unwrap().west, "-73.9909438636055");
    }

    #[test]
    fn test_nested_group_lookup() {
        let xml = r#"<WMS_Capabilities version="1.3.0"><Capability>
            <Layer><Title>root</Title>
              <Layer><Name>group</Name>
                <Layer><Name>inner</Name>
                  <EX_GeographicBoundingBox>
                    <westBoundLongitude>-1</westBoundLongitude>
                    <eastBoundLongitude>1</eastBoundLongitude>
                    <southBoundLatitude>-2</southBoundLatitude>
                    <northBoundLatitude>2</northBoundLatitude>
                  </EX_GeographicBoundingBox>
                </Layer>
              </Layer>
            </Layer></Capability></WMS_Capabilities>"#;
        let doc = parse_capabilities(xml).unwrap();
        assert!(has_layers(&doc));
        assert_eq!(layers(&doc).len(), 3);
        let bbox = extract_bounding_box(&doc, "inner").unwrap();
        assert_eq!(bbox.corners(), [["-2", "-1"], ["2", "1"]]);
        assert!(extract_bounding_box(&doc, "group").is_none());
    }

    #[test]
    fn test_time_dimension_named_case_insensitively() {
        let xml = r#"<WMS_Capabilities version="1.3.0"><Capability><Layer>
            <Layer><Name>fires</Name>
              <Dimension name="elevation" units="m">0,10</Dimension>
              <Dimension name="TIME" units="ISO8601" default="2020-01-01">2020-01-01,2019-01-01</Dimension>
            </Layer></Layer></Capability></WMS_Capabilities>"#;
        let doc = parse_capabilities(xml).unwrap();
        let dim = layer_temporal_dimension(&doc, "fires").unwrap().unwrap();
        assert_eq!(dim.name, "TIME");
        assert_eq!(dim.units.as_deref(), Some("ISO8601"));
        let years: Vec<i32> = dim.values.iter().map(|v| v.year()).collect();
        assert_eq!(years, vec![2019, 2020]);
        assert_eq!(extract_temporal_dimension(&doc).unwrap(), Some(dim));
    }

    #[test]
    fn test_extent_fallback_for_1_1_1() {
        let xml = r#"<WMT_MS_Capabilities version="1.1.1"><Capability><Layer>
            <Layer><Name>fires</Name>
              <Dimension name="time" units="ISO8601"/>
              <Extent name="time" default="2003-01-01">2003-01-01,2001-01-01</Extent>
            </Layer></Layer></Capability></WMT_MS_Capabilities>"#;
        let doc = parse_capabilities(xml).unwrap();
        let dim = extract_temporal_dimension(&doc).unwrap().unwrap();
        assert_eq!(dim.values.len(), 2);
        assert_eq!(dim.first().unwrap().year(), 2001);
    }

    #[test]
    fn test_layer_without_time_dimension() {
        let doc = parse_capabilities(
            "<WMS_Capabilities><Capability><Layer><Name>a</Name></Layer></Capability></WMS_Capabilities>",
        )
        .unwrap();
        assert_eq!(layer_temporal_dimension(&doc, "a").unwrap(), None);
        assert_eq!(layer_temporal_dimension(&doc, "missing").unwrap(), None);
        assert_eq!(extract_temporal_dimension(&doc).unwrap(), None);
    }
}
