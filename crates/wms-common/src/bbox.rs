//! Bounding box types.

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};

use crate::{WmsError, WmsResult};

/// A layer's geographic extent as advertised in its capabilities document.
///
/// Coordinates keep the exact decimal text of the document; nothing is parsed
/// or rounded on the way through. Serialises as `[[south, west], [north, east]]`,
/// the corner-pair shape web map viewports accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeographicBoundingBox {
    pub south: String,
    pub west: String,
    pub north: String,
    pub east: String,
}

impl GeographicBoundingBox {
    pub fn new(
        south: impl Into<String>,
        west: impl Into<String>,
        north: impl Into<String>,
        east: impl Into<String>,
    ) -> Self {
        Self {
            south: south.into(),
            west: west.into(),
            north: north.into(),
            east: east.into(),
        }
    }

    /// `[[south, west], [north, east]]`
    pub fn corners(&self) -> [[&str; 2]; 2] {
        [
            [self.south.as_str(), self.west.as_str()],
            [self.north.as_str(), self.east.as_str()],
        ]
    }

    /// Convert to a numeric box (x = longitude, y = latitude).
    pub fn to_numeric(&self) -> WmsResult<BoundingBox> {
        let parse = |s: &str| -> WmsResult<f64> {
            s.trim()
                .parse()
                .map_err(|_| WmsError::InvalidBbox(format!("not a number: '{}'", s)))
        };
        Ok(BoundingBox::new(
            parse(&self.west)?,
            parse(&self.south)?,
            parse(&self.east)?,
            parse(&self.north)?,
        ))
    }
}

impl Serialize for GeographicBoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        for corner in self.corners() {
            tuple.serialize_element(&corner)?;
        }
        tuple.end()
    }
}

/// A numeric bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prodes() -> GeographicBoundingBox {
        GeographicBoundingBox::new(
            "-16.2779683090209",
            "-73.8538648282111",
            "5.20548191938395",
            "-44.0",
        )
    }

    #[test]
    fn test_corners_keep_source_text() {
        assert_eq!(
            prodes().corners(),
            [
                ["-16.2779683090209", "-73.8538648282111"],
                ["5.20548191938395", "-44.0"]
            ]
        );
    }

    #[test]
    fn test_serializes_as_corner_pairs() {
        let json = serde_json::to_string(&prodes()).unwrap();
        assert_eq!(
            json,
            r#"[["-16.2779683090209","-73.8538648282111"],["5.20548191938395","-44.0"]]"#
        );
    }

    #[test]
    fn test_to_numeric() {
        let bbox = prodes().to_numeric().unwrap();
        assert_eq!(bbox.min_x, -73.8538648282111);
        assert_eq!(bbox.min_y, -16.2779683090209);
        assert_eq!(bbox.max_x, -44.0);
        assert_eq!(bbox.max_y, 5.20548191938395);
    }

    #[test]
    fn test_to_numeric_rejects_garbage() {
        let bbox = GeographicBoundingBox::new("south", "0", "1", "1");
        assert!(matches!(bbox.to_numeric(), Err(WmsError::InvalidBbox(_))));
    }

    #[test]
    fn test_center() {
        let bbox = BoundingBox::new(-10.0, -20.0, 10.0, 20.0);
        assert_eq!(bbox.center(), (0.0, 0.0));
    }
}
