//! Geometry preparation for lon/lat AOIs
//!
//! - Area: geodesic square kilometers
//! - Centroid / centered square
//! - Clip: cut to the valid lon/lat range
//! - Buffer: outward margin in meters
//! - Simplify: Douglas-Peucker with a tolerance in meters
//! - WKT: serialization for occurrence search filters

mod buffer;
mod clip;
mod measurements;
mod simplify;
mod spatial;
mod wkt;

pub use buffer::{buffer_polygon, circle_around, BufferParams};
pub use clip::{clip_to_box, WORLD};
pub use measurements::{geodesic_area_km2, meters_to_degrees, METERS_PER_DEGREE};
pub use simplify::simplify_polygon;
pub use spatial::{centroid, square_around, BoundingBox};
pub use wkt::polygon_to_wkt;
