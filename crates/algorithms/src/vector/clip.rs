//! Clipping lon/lat polygons to a rectangle
//!
//! Sutherland-Hodgman against each side of the box in turn. The box is
//! convex, so the result is exact for any simple input ring.

use geo::{Coord, LineString, Polygon};

use super::spatial::BoundingBox;

/// Valid lon/lat range.
pub const WORLD: BoundingBox = BoundingBox {
    min_x: -180.0,
    min_y: -90.0,
    max_x: 180.0,
    max_y: 90.0,
};

#[derive(Clone, Copy)]
enum Side {
    West(f64),
    East(f64),
    South(f64),
    North(f64),
}

impl Side {
    fn keeps(self, c: Coord<f64>) -> bool {
        match self {
            Side::West(x) => c.x >= x,
            Side::East(x) => c.x <= x,
            Side::South(y) => c.y >= y,
            Side::North(y) => c.y <= y,
        }
    }

    /// Where segment `a`-`b` crosses this side. Only called when exactly
    /// one endpoint is kept, so the divisor is never zero.
    fn crossing(self, a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
        match self {
            Side::West(x) | Side::East(x) => {
                let t = (x - a.x) / (b.x - a.x);
                Coord {
                    x,
                    y: a.y + t * (b.y - a.y),
                }
            }
            Side::South(y) | Side::North(y) => {
                let t = (y - a.y) / (b.y - a.y);
                Coord {
                    x: a.x + t * (b.x - a.x),
                    y,
                }
            }
        }
    }
}

fn clip_side(ring: &[Coord<f64>], side: Side) -> Vec<Coord<f64>> {
    let mut out = Vec::with_capacity(ring.len() + 2);
    for (i, &cur) in ring.iter().enumerate() {
        let prev = ring[(i + ring.len() - 1) % ring.len()];
        match (side.keeps(prev), side.keeps(cur)) {
            (true, true) => out.push(cur),
            (true, false) => out.push(side.crossing(prev, cur)),
            (false, true) => {
                out.push(side.crossing(prev, cur));
                out.push(cur);
            }
            (false, false) => {}
        }
    }
    out
}

/// Part of `polygon`'s exterior inside `bbox`, `None` if nothing is left.
///
/// Holes are dropped.
pub fn clip_to_box(polygon: &Polygon<f64>, bbox: &BoundingBox) -> Option<Polygon<f64>> {
    let mut ring: Vec<Coord<f64>> = polygon.exterior().0.clone();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    for side in [
        Side::West(bbox.min_x),
        Side::East(bbox.max_x),
        Side::South(bbox.min_y),
        Side::North(bbox.max_y),
    ] {
        ring = clip_side(&ring, side);
        ring.dedup();
        if ring.len() < 3 {
            return None;
        }
    }

    Some(Polygon::new(LineString::new(ring), vec![]))
}
