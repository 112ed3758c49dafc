//! Centroid and centered squares on lon/lat geometry

use geo::{Centroid as GeoCentroid, LineString, Point, Polygon};

use super::measurements::meters_to_degrees;

/// Axis-aligned bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Closed counter-clockwise ring starting at the south-west corner.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (self.min_x, self.min_y),
                (self.max_x, self.min_y),
                (self.max_x, self.max_y),
                (self.min_x, self.max_y),
                (self.min_x, self.min_y),
            ]),
            vec![],
        )
    }
}

/// Planar centroid in lon/lat, `None` for an empty polygon.
pub fn centroid(polygon: &Polygon<f64>) -> Option<Point<f64>> {
    polygon.centroid()
}

/// Square of `side_km` centered on `center`, as a lon/lat box.
///
/// Edges follow meridians and parallels. The longitude span is widened by
/// `1/cos(lat)` at the center latitude. A center too close to a pole or to
/// the antimeridian is moved inward until the whole square fits, so the box
/// is always centered on its own center and never wraps.
pub fn square_around(center: Point<f64>, side_km: f64) -> BoundingBox {
    let half_m = side_km * 1000.0 / 2.0;

    let (_, half_lat) = meters_to_degrees(half_m, center.y());
    let half_lat = half_lat.min(90.0);
    let cy = center.y().clamp(-90.0 + half_lat, 90.0 - half_lat);

    let (half_lon, _) = meters_to_degrees(half_m, cy);
    let half_lon = half_lon.min(180.0);
    let cx = center.x().clamp(-180.0 + half_lon, 180.0 - half_lon);

    BoundingBox {
        min_x: cx - half_lon,
        min_y: cy - half_lat,
        max_x: cx + half_lon,
        max_y: cy + half_lat,
    }
}
