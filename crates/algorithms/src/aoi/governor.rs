//! AOI area governance
//!
//! An AOI larger than the policy ceiling is replaced by an axis-aligned
//! square centered on its centroid. The substitute keeps the location but
//! not the shape, so callers must display the governed AOI rather than the
//! one the user drew.

use ecometrics_core::{AreaPolicy, Aoi, Error, Result};
use geo::{Coord, Polygon};
use serde::Serialize;
use tracing::{info, warn};

use crate::vector::{centroid, geodesic_area_km2, square_around};

/// Coordinate tolerance (degrees) when checking whether an AOI already is
/// its own substitute.
const FIXED_POINT_TOLERANCE: f64 = 1e-9;

/// Outcome of [`enforce_area_limit`].
#[derive(Debug, Clone, PartialEq)]
pub struct GovernedAoi {
    /// AOI to analyze and display.
    pub aoi: Aoi,
    /// Area of the input AOI in km².
    pub original_area_km2: f64,
    /// Whether the input was replaced by the substitute square.
    pub substituted: bool,
}

impl GovernedAoi {
    /// Area of the governed AOI in km².
    pub fn area_km2(&self) -> f64 {
        geodesic_area_km2(self.aoi.polygon())
    }

    pub fn into_aoi(self) -> Aoi {
        self.aoi
    }

    pub fn summary(&self) -> GovernanceSummary {
        GovernanceSummary {
            original_area_km2: self.original_area_km2,
            area_km2: self.area_km2(),
            substituted: self.substituted,
        }
    }
}

/// Serializable view of a governance decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GovernanceSummary {
    pub original_area_km2: f64,
    pub area_km2: f64,
    pub substituted: bool,
}

/// Enforce the area ceiling of `policy` on `aoi`.
///
/// AOIs within the ceiling come back unchanged. Larger ones are replaced by
/// a square of side `policy.substitute_side_km()` around their centroid and
/// a warning is logged. Applying this twice gives the same AOI as applying
/// it once.
///
/// # Errors
/// * `InvalidParameter` for an invalid policy
/// * `InvalidGeometry` if the AOI has no centroid
pub fn enforce_area_limit(aoi: &Aoi, policy: &AreaPolicy) -> Result<GovernedAoi> {
    policy.validate()?;

    let area = geodesic_area_km2(aoi.polygon());
    if area <= policy.max_km2 {
        info!("AOI area {:.2} km² within the {} km² limit", area, policy.max_km2);
        return Ok(GovernedAoi {
            aoi: aoi.clone(),
            original_area_km2: area,
            substituted: false,
        });
    }

    let center = centroid(aoi.polygon())
        .ok_or_else(|| Error::InvalidGeometry("AOI has no centroid".into()))?;
    let side_km = policy.substitute_side_km();
    let square = square_around(center, side_km).to_polygon();

    if same_ring(aoi.polygon(), &square) {
        return Ok(GovernedAoi {
            aoi: aoi.clone(),
            original_area_km2: area,
            substituted: false,
        });
    }

    warn!(
        "AOI area {:.2} km² exceeds the {} km² limit; \
         analyzing a {:.1} km square around ({:.5}, {:.5}) instead",
        area,
        policy.max_km2,
        side_km,
        center.x(),
        center.y()
    );

    Ok(GovernedAoi {
        aoi: Aoi::new(square)?,
        original_area_km2: area,
        substituted: true,
    })
}

fn same_ring(a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
    let (ra, rb) = (&a.exterior().0, &b.exterior().0);
    a.interiors().is_empty()
        && ra.len() == rb.len()
        && ra.iter().zip(rb).all(|(p, q)| close(p, q))
}

fn close(p: &Coord<f64>, q: &Coord<f64>) -> bool {
    (p.x - q.x).abs() < FIXED_POINT_TOLERANCE && (p.y - q.y).abs() < FIXED_POINT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Centroid, LineString};

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Aoi {
        Aoi::new(Polygon::new(
            LineString::from(vec![
                (min_x, min_y),
                (max_x, min_y),
                (max_x, max_y),
                (min_x, max_y),
                (min_x, min_y),
            ]),
            vec![],
        ))
        .unwrap()
    }

    #[test]
    fn test_small_aoi_unchanged() {
        let aoi = rect(-3.75, 40.40, -3.65, 40.45);
        let governed = enforce_area_limit(&aoi, &AreaPolicy::default()).unwrap();
        assert!(!governed.substituted);
        assert_eq!(governed.aoi, aoi);
        assert!(governed.original_area_km2 > 0.0);
        assert!(governed.original_area_km2 < 500.0);
    }

    #[test]
    fn test_large_aoi_substituted_around_centroid() {
        let aoi = rect(-5.0, 39.0, -2.0, 42.0);
        let governed = enforce_area_limit(&aoi, &AreaPolicy::default()).unwrap();
        assert!(governed.substituted);
        assert!(governed.original_area_km2 > 500.0);

        let before = aoi.polygon().centroid().unwrap();
        let after = governed.aoi.polygon().centroid().unwrap();
        assert!((before.x() - after.x()).abs() < 1e-6);
        assert!((before.y() - after.y()).abs() < 1e-6);

        // side 2·√500 km → about 2000 km²
        let area = governed.area_km2();
        assert!((area - 2000.0).abs() < 40.0, "got {area}");
    }

    #[test]
    fn test_side_factor_one_bounds_area() {
        let policy = AreaPolicy {
            max_km2: 500.0,
            side_factor: 1.0,
        };
        let aoi = rect(-5.0, 39.0, -2.0, 42.0);
        let governed = enforce_area_limit(&aoi, &policy).unwrap();
        assert!((governed.area_km2() - 500.0).abs() < 10.0);
    }

    #[test]
    fn test_idempotent() {
        let policy = AreaPolicy::default();
        let aoi = rect(10.0, 44.0, 13.0, 46.5);
        let once = enforce_area_limit(&aoi, &policy).unwrap();
        let twice = enforce_area_limit(&once.aoi, &policy).unwrap();
        assert_eq!(once.aoi, twice.aoi);
        assert!(!twice.substituted);
    }

    #[test]
    fn test_clockwise_small_aoi_unchanged() {
        let cw = Aoi::new(Polygon::new(
            LineString::from(vec![
                (-3.75, 40.40),
                (-3.75, 40.45),
                (-3.65, 40.45),
                (-3.65, 40.40),
                (-3.75, 40.40),
            ]),
            vec![],
        ))
        .unwrap();
        let governed = enforce_area_limit(&cw, &AreaPolicy::default()).unwrap();
        assert!(!governed.substituted);
        assert_eq!(governed.aoi, cw);

        let ccw = enforce_area_limit(&rect(-3.75, 40.40, -3.65, 40.45), &AreaPolicy::default())
            .unwrap();
        assert!((governed.original_area_km2 - ccw.original_area_km2).abs() < 1e-6);
    }

    #[test]
    fn test_idempotent_at_antimeridian() {
        let policy = AreaPolicy::default();
        let aoi = rect(179.7, -10.0, 180.0, 10.0);
        let once = enforce_area_limit(&aoi, &policy).unwrap();
        assert!(once.substituted);

        let bounds = once.aoi.polygon().exterior();
        assert!(bounds.points().all(|p| p.x() <= 180.0 && p.x() >= -180.0));

        let twice = enforce_area_limit(&once.aoi, &policy).unwrap();
        assert_eq!(once.aoi, twice.aoi);
        assert!(!twice.substituted);
    }

    #[test]
    fn test_idempotent_near_pole() {
        let policy = AreaPolicy::default();
        let aoi = rect(-20.0, 88.0, 20.0, 89.95);
        let once = enforce_area_limit(&aoi, &policy).unwrap();
        assert!(once.substituted);
        let twice = enforce_area_limit(&once.aoi, &policy).unwrap();
        assert_eq!(once.aoi, twice.aoi);
    }

    #[test]
    fn test_invalid_policy() {
        let aoi = rect(0.0, 0.0, 0.1, 0.1);
        let policy = AreaPolicy {
            max_km2: 0.0,
            side_factor: 2.0,
        };
        assert!(matches!(
            enforce_area_limit(&aoi, &policy),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
