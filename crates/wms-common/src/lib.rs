//! Common types shared by the capabilities parser, the resolver client and
//! the bounds-probe CLI.

pub mod bbox;
pub mod error;
pub mod layer;
pub mod time;

pub use bbox::{BoundingBox, GeographicBoundingBox};
pub use error::{WmsError, WmsResult};
pub use layer::{Datasource, LayerDescriptor};
pub use time::TemporalDimension;
