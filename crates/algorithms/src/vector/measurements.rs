//! Geographic measurements on lon/lat polygons

use geo::orient::{Direction, Orient};
use geo::{GeodesicArea, Polygon};

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Geodesic area of a lon/lat polygon in square kilometers.
///
/// Holes are subtracted. The ring is oriented first: a clockwise exterior
/// would otherwise be measured as the rest of the globe.
pub fn geodesic_area_km2(polygon: &Polygon<f64>) -> f64 {
    polygon.orient(Direction::Default).geodesic_area_unsigned() / 1e6
}

/// Degrees of longitude and latitude spanned by `meters` at latitude `lat`.
///
/// Spherical approximation; longitude degrees grow toward the poles and are
/// capped at a full turn.
pub fn meters_to_degrees(meters: f64, lat: f64) -> (f64, f64) {
    let dlat = meters / METERS_PER_DEGREE;
    let cos_lat = lat.to_radians().cos().abs();
    let dlon = if cos_lat < 1e-10 {
        360.0
    } else {
        (meters / (METERS_PER_DEGREE * cos_lat)).min(360.0)
    };
    (dlon, dlat)
}
