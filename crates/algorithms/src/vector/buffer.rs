//! Outward buffer of lon/lat polygons
//!
//! The buffer is the convex envelope of a circle around every exterior
//! vertex. It contains the exact buffer and loses concavities, which is
//! acceptable for a search filter.

use geo::{ConvexHull, LineString, MultiPoint, Point, Polygon};
use std::f64::consts::PI;

use super::measurements::meters_to_degrees;

/// Parameters for buffer operations
#[derive(Debug, Clone)]
pub struct BufferParams {
    /// Buffer distance in meters; zero or less returns the input
    pub distance_m: f64,
    /// Number of segments per vertex circle (default: 16)
    pub segments: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            distance_m: 10_000.0,
            segments: 16,
        }
    }
}

/// Circle of `radius_m` around a lon/lat point.
///
/// In degrees the circle is an ellipse stretched along longitude.
pub fn circle_around(center: Point<f64>, radius_m: f64, segments: usize) -> Polygon<f64> {
    let n = segments.max(4);
    let (rx, ry) = meters_to_degrees(radius_m.abs(), center.y());

    let mut coords = Vec::with_capacity(n + 1);
    for i in 0..n {
        let angle = 2.0 * PI * i as f64 / n as f64;
        coords.push((center.x() + rx * angle.cos(), center.y() + ry * angle.sin()));
    }
    coords.push(coords[0]);

    Polygon::new(LineString::from(coords), vec![])
}

/// Expand a polygon outward by `params.distance_m`.
pub fn buffer_polygon(polygon: &Polygon<f64>, params: &BufferParams) -> Polygon<f64> {
    if !(params.distance_m > 0.0) {
        return polygon.clone();
    }

    let points: Vec<Point<f64>> = polygon
        .exterior()
        .points()
        .flat_map(|p| {
            circle_around(p, params.distance_m, params.segments)
                .exterior()
                .points()
                .collect::<Vec<_>>()
        })
        .collect();

    MultiPoint::from(points).convex_hull()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::geodesic_area_km2;
    use geo::{Area, Contains};

    fn small_square() -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (10.0, 45.0),
                (10.01, 45.0),
                (10.01, 45.01),
                (10.0, 45.01),
                (10.0, 45.0),
            ]),
            vec![],
        )
    }

    #[test]
    fn test_circle_vertex_count() {
        let c = circle_around(Point::new(5.0, 5.0), 1000.0, 32);
        assert_eq!(c.exterior().0.len(), 33);
    }

    #[test]
    fn test_circle_area() {
        let c = circle_around(Point::new(0.0, 0.0), 10_000.0, 64);
        let expected = PI * 100.0;
        let err = (geodesic_area_km2(&c) - expected).abs() / expected;
        assert!(err < 0.02, "circle area error {:.2}%", err * 100.0);
    }

    #[test]
    fn test_buffer_contains_input() {
        let sq = small_square();
        let buffered = buffer_polygon(&sq, &BufferParams::default());
        assert!(buffered.contains(&sq));
        assert!(buffered.unsigned_area() > sq.unsigned_area() * 100.0);
    }

    #[test]
    fn test_zero_distance_is_identity() {
        let sq = small_square();
        let params = BufferParams {
            distance_m: 0.0,
            segments: 16,
        };
        assert_eq!(buffer_polygon(&sq, &params), sq);
    }
}
