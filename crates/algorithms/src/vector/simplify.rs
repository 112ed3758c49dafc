//! Douglas-Peucker simplification with a tolerance in meters

use geo::{LineString, Polygon, Simplify};

use super::measurements::METERS_PER_DEGREE;

/// Simplify a lon/lat polygon, dropping vertices within `tolerance_m` of
/// the simplified outline.
///
/// The tolerance is converted at the latitude-degree scale. Rings that would
/// collapse below four coordinates are kept as they were.
pub fn simplify_polygon(polygon: &Polygon<f64>, tolerance_m: f64) -> Polygon<f64> {
    if !(tolerance_m > 0.0) {
        return polygon.clone();
    }
    let epsilon = tolerance_m / METERS_PER_DEGREE;

    let exterior = simplify_ring(polygon.exterior(), epsilon);
    let interiors: Vec<LineString<f64>> = polygon
        .interiors()
        .iter()
        .map(|ring| simplify_ring(ring, epsilon))
        .collect();
    Polygon::new(exterior, interiors)
}

fn simplify_ring(ring: &LineString<f64>, epsilon: f64) -> LineString<f64> {
    let simplified = ring.simplify(&epsilon);
    if simplified.0.len() < 4 {
        ring.clone()
    } else {
        simplified
    }
}
