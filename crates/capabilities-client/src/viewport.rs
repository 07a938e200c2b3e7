//! The map collaborator that consumes resolved extents.

use wms_common::GeographicBoundingBox;

/// Something that can be zoomed to a geographic extent, such as a web map
/// widget bridged from the dashboard.
pub trait Viewport {
    fn fit_bounds(&mut self, bounds: &GeographicBoundingBox);
}

/// Recorded extents, most recent last. Useful for headless callers and tests.
impl Viewport for Vec<GeographicBoundingBox> {
    fn fit_bounds(&mut self, bounds: &GeographicBoundingBox) {
        self.push(bounds.clone());
    }
}
