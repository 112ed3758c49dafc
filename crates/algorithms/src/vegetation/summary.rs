//! Area and percentage summary of a forest rating histogram

use ecometrics_core::{Error, Rating, RatingHistogram, Result};
use serde::Serialize;

/// Area and share of forest per rating.
///
/// Arrays are indexed by rating − 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub total_pixels: u64,
    pub total_ha: f64,
    pub pct_by_rating: [f64; 5],
    pub ha_by_rating: [f64; 5],
    /// Ratings 1 and 2.
    pub degraded_pixels: u64,
    pub degraded_ha: f64,
    pub degraded_pct: f64,
    /// Ratings 3 to 5.
    pub good_ha: f64,
    pub good_pct: f64,
    /// Ratings 4 and 5.
    pub good_or_excellent_pct: f64,
}

impl RatingSummary {
    pub fn pct(&self, rating: Rating) -> f64 {
        self.pct_by_rating[rating.value() as usize - 1]
    }

    pub fn ha(&self, rating: Rating) -> f64 {
        self.ha_by_rating[rating.value() as usize - 1]
    }
}

/// Summarize a rating histogram sampled at `pixel_scale_m`.
///
/// A histogram with no pixels (no forest in the AOI) gives zeros
/// everywhere rather than NaN.
///
/// # Errors
/// * `InvalidParameter` if `pixel_scale_m` is not a positive finite number
pub fn summarize_ratings(histogram: &RatingHistogram, pixel_scale_m: f64) -> Result<RatingSummary> {
    if !(pixel_scale_m.is_finite() && pixel_scale_m > 0.0) {
        return Err(Error::InvalidParameter {
            name: "pixel_scale_m",
            value: pixel_scale_m.to_string(),
            reason: "must be a positive number of meters".into(),
        });
    }

    let pixel_ha = pixel_scale_m * pixel_scale_m / 10_000.0;
    let total = histogram.total();
    let pct = |count: u64| {
        if total > 0 {
            count as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    };

    let mut pct_by_rating = [0.0; 5];
    let mut ha_by_rating = [0.0; 5];
    for (i, rating) in Rating::ALL.iter().enumerate() {
        let count = histogram.count(*rating);
        pct_by_rating[i] = pct(count);
        ha_by_rating[i] = count as f64 * pixel_ha;
    }

    let degraded = histogram.degraded();
    let good = histogram.good();
    let good_or_excellent = histogram.count(Rating::Good) + histogram.count(Rating::Excellent);

    Ok(RatingSummary {
        total_pixels: total,
        total_ha: total as f64 * pixel_ha,
        pct_by_rating,
        ha_by_rating,
        degraded_pixels: degraded,
        degraded_ha: degraded as f64 * pixel_ha,
        degraded_pct: pct(degraded),
        good_ha: good as f64 * pixel_ha,
        good_pct: pct(good),
        good_or_excellent_pct: pct(good_or_excellent),
    })
}
