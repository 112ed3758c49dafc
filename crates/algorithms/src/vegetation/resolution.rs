//! Reduction resolution as a step function of AOI area

use ecometrics_core::ResolutionPolicy;

/// Pixel size in meters for a rating reduction over `area_km2`.
///
/// Uses the step with the largest threshold strictly below the area; below
/// every step the base resolution applies.
pub fn pixel_scale_for(area_km2: f64, policy: &ResolutionPolicy) -> f64 {
    policy
        .steps
        .iter()
        .filter(|s| area_km2 > s.above_km2)
        .max_by(|a, b| a.above_km2.total_cmp(&b.above_km2))
        .map(|s| s.scale_m)
        .unwrap_or(policy.base_scale_m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_steps() {
        let p = ResolutionPolicy::default();
        assert_eq!(pixel_scale_for(5.0, &p), 10.0);
        assert_eq!(pixel_scale_for(10.0, &p), 10.0);
        assert_eq!(pixel_scale_for(10.5, &p), 20.0);
        assert_eq!(pixel_scale_for(75.0, &p), 30.0);
        assert_eq!(pixel_scale_for(100.1, &p), 100.0);
        assert_eq!(pixel_scale_for(2000.0, &p), 100.0);
    }

    #[test]
    fn test_monotonic() {
        let p = ResolutionPolicy::default();
        let mut previous = 0.0;
        for i in 0..2000 {
            let scale = pixel_scale_for(i as f64 * 0.25, &p);
            assert!(scale >= previous);
            previous = scale;
        }
    }
}
