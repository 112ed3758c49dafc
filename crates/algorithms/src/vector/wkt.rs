//! Well-known text output for search filters

use geo::orient::{Direction, Orient};
use geo::{LineString, Polygon};

/// Polygon as WKT with counter-clockwise exterior and 6-decimal coordinates.
///
/// ```text
/// POLYGON((lon lat,lon lat,...),(hole...))
/// ```
pub fn polygon_to_wkt(polygon: &Polygon<f64>) -> String {
    let oriented = polygon.orient(Direction::Default);
    let rings: Vec<String> = std::iter::once(oriented.exterior())
        .chain(oriented.interiors())
        .map(ring_to_wkt)
        .collect();
    format!("POLYGON({})", rings.join(","))
}

fn ring_to_wkt(ring: &LineString<f64>) -> String {
    let coords: Vec<String> = ring
        .coords()
        .map(|c| format!("{:.6} {:.6}", c.x, c.y))
        .collect();
    format!("({})", coords.join(","))
}
