//! OGC WMS GetCapabilities client-side protocol support.
//!
//! Supports:
//! - Building workspace/layer-scoped GetCapabilities URLs
//! - Parsing capabilities XML into a typed element tree
//! - Reading layer bounding boxes (WMS 1.3.0 and 1.1.1 shapes) and time dimensions

pub mod capabilities;
pub mod request;
pub mod xml;

pub use capabilities::{
    bounding_box_of, extract_bounding_box, extract_temporal_dimension, find_layer,
    layer_temporal_dimension, BoundingBoxShape, CrsAttribute, CrsBoundingBox,
};
pub use request::{build_capabilities_url, CapabilitiesQuery, DEFAULT_ANCHOR, GET_CAPABILITIES_QUERY};
pub use xml::{parse_capabilities, CapabilitiesDocument, Element, XmlDeclaration};
