//! NDVI percentile rating against a seasonal baseline
//!
//! A forest pixel's current NDVI composite (median over a recent window) is
//! compared with percentiles of the NDVI observed in the same calendar
//! window across several baseline years:
//!
//! | condition       | rating |
//! |-----------------|--------|
//! | `ndvi >= p90`   | 5      |
//! | `ndvi >= p70`   | 4      |
//! | `ndvi >= p35`   | 3      |
//! | `ndvi >= p25`   | 2      |
//! | otherwise       | 1      |
//!
//! The raster compute service evaluates this rule at scale; the functions
//! here are the in-memory reference used on small grids and in tests.
//! Baseline observations are pooled across years. A year without imagery
//! adds nothing to the pool, so every valid observation weighs the same.

use chrono::{Datelike, NaiveDate};
use ecometrics_core::{BaselineWindow, Error, Rating, RatingHistogram, Result};
use ndarray::Array2;

use crate::maybe_rayon::*;

/// Percentiles of the seasonal baseline used as rating thresholds.
pub const BASELINE_PERCENTILES: [f64; 4] = [25.0, 35.0, 70.0, 90.0];

/// Grid value for pixels that are not rated (outside the forest mask or
/// without data).
pub const UNRATED: u8 = 0;

/// Normalized difference vegetation index `(nir - red) / (nir + red)`.
///
/// Returns NaN when either band is not finite or both are zero.
pub fn ndvi(nir: f64, red: f64) -> f64 {
    if !nir.is_finite() || !red.is_finite() {
        return f64::NAN;
    }
    let sum = nir + red;
    if sum.abs() < 1e-10 {
        return f64::NAN;
    }
    (nir - red) / sum
}

/// Median of the finite values, `None` if there are none.
pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted_finite(values);
    percentile(&sorted, 50.0)
}

/// Linear-interpolated percentile of an ascending slice.
///
/// `p` is in percent and clamped to [0, 100].
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Rating thresholds for one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingThresholds {
    pub p25: f64,
    pub p35: f64,
    pub p70: f64,
    pub p90: f64,
}

impl RatingThresholds {
    /// Thresholds from pooled baseline observations. Non-finite values are
    /// skipped; `None` when nothing valid remains.
    pub fn from_baseline(observations: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(observations);
        let [p25, p35, p70, p90] = BASELINE_PERCENTILES;
        Some(Self {
            p25: percentile(&sorted, p25)?,
            p35: percentile(&sorted, p35)?,
            p70: percentile(&sorted, p70)?,
            p90: percentile(&sorted, p90)?,
        })
    }
}

/// Rate a current NDVI value against its thresholds.
pub fn rate(ndvi: f64, t: &RatingThresholds) -> Rating {
    if ndvi >= t.p90 {
        Rating::Excellent
    } else if ndvi >= t.p70 {
        Rating::Good
    } else if ndvi >= t.p35 {
        Rating::Moderate
    } else if ndvi >= t.p25 {
        Rating::Poor
    } else {
        Rating::VeryPoor
    }
}

/// The current window's month/day span in every baseline year.
///
/// A window that starts or ends on 29 February falls back to the 28th in
/// non-leap years.
pub fn seasonal_windows(window: &BaselineWindow) -> Vec<(NaiveDate, NaiveDate)> {
    let span_years = window.current_end.year() - window.current_start.year();
    (window.history_start_year..=window.history_end_year)
        .filter_map(|year| {
            let start = same_day_in(window.current_start, year)?;
            let end = same_day_in(window.current_end, year + span_years)?;
            Some((start, end))
        })
        .collect()
}

/// Rate every forest pixel of a grid.
///
/// # Arguments
/// * `landcover` - Land-cover class per pixel
/// * `current` - Current NDVI composite per pixel (NaN = no data)
/// * `baseline` - Baseline NDVI observations, one grid per image, all years pooled
/// * `forest_class` - Land-cover class that defines the mask
///
/// # Returns
/// Rating values 1..=5, or [`UNRATED`] outside the mask or without data
pub fn rate_forest_grid(
    landcover: &Array2<u16>,
    current: &Array2<f64>,
    baseline: &[Array2<f64>],
    forest_class: u16,
) -> Result<Array2<u8>> {
    let shape = landcover.dim();
    if current.dim() != shape {
        return Err(shape_mismatch("current", shape, current.dim()));
    }
    if let Some(grid) = baseline.iter().find(|g| g.dim() != shape) {
        return Err(shape_mismatch("baseline", shape, grid.dim()));
    }

    let (rows, cols) = shape;
    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![UNRATED; cols];
            let mut pool = Vec::with_capacity(baseline.len());

            for (col, out) in row_data.iter_mut().enumerate() {
                if landcover[[row, col]] != forest_class {
                    continue;
                }
                let value = current[[row, col]];
                if !value.is_finite() {
                    continue;
                }

                pool.clear();
                pool.extend(baseline.iter().map(|g| g[[row, col]]));
                if let Some(t) = RatingThresholds::from_baseline(&pool) {
                    *out = rate(value, &t).value();
                }
            }

            row_data
        })
        .collect();

    Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))
}

/// Frequency histogram of a rating grid, ignoring unrated pixels.
pub fn rating_histogram(ratings: &Array2<u8>) -> RatingHistogram {
    let mut hist = RatingHistogram::new();
    for &v in ratings.iter() {
        if let Some(r) = Rating::from_value(v) {
            hist.add(r, 1);
        }
    }
    hist
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    v.sort_by(f64::total_cmp);
    v
}

fn same_day_in(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
}

fn shape_mismatch(name: &'static str, expected: (usize, usize), got: (usize, usize)) -> Error {
    Error::InvalidParameter {
        name,
        value: format!("{}x{}", got.0, got.1),
        reason: format!("grid must be {}x{}", expected.0, expected.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn thresholds() -> RatingThresholds {
        RatingThresholds {
            p25: 0.5,
            p35: 0.6,
            p70: 0.7,
            p90: 0.8,
        }
    }

    #[test]
    fn test_rate_boundaries() {
        let t = thresholds();
        assert_eq!(rate(0.8, &t), Rating::Excellent);
        assert_eq!(rate(0.79, &t), Rating::Good);
        assert_eq!(rate(0.7, &t), Rating::Good);
        assert_eq!(rate(0.6, &t), Rating::Moderate);
        assert_eq!(rate(0.5, &t), Rating::Poor);
        assert_eq!(rate(0.49, &t), Rating::VeryPoor);
        assert_eq!(rate(-1.0, &t), Rating::VeryPoor);
    }

    #[test]
    fn test_percentile_interpolation() {
        let s = [0.0, 10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&s, 0.0), Some(0.0));
        assert_eq!(percentile(&s, 100.0), Some(40.0));
        assert_eq!(percentile(&s, 50.0), Some(20.0));
        assert!((percentile(&s, 35.0).unwrap() - 14.0).abs() < 1e-12);
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_thresholds_skip_missing_years() {
        let with_gaps = [0.1, f64::NAN, 0.3, f64::NAN, 0.5];
        let clean = [0.1, 0.3, 0.5];
        assert_eq!(
            RatingThresholds::from_baseline(&with_gaps),
            RatingThresholds::from_baseline(&clean)
        );
        assert!(RatingThresholds::from_baseline(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_ndvi() {
        assert!((ndvi(0.5, 0.1) - 0.4 / 0.6).abs() < 1e-12);
        assert!(ndvi(0.0, 0.0).is_nan());
        assert!(ndvi(f64::NAN, 0.2).is_nan());
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, f64::NAN, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_seasonal_windows() {
        let window = BaselineWindow::default();
        let windows = seasonal_windows(&window);
        assert_eq!(windows.len(), 7);
        assert_eq!(
            windows[0],
            (
                NaiveDate::from_ymd_opt(2018, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2018, 8, 31).unwrap()
            )
        );
        assert_eq!(windows[6].0.year(), 2024);
    }

    #[test]
    fn test_seasonal_windows_leap_day() {
        let window = BaselineWindow {
            current_start: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            current_end: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            history_start_year: 2022,
            history_end_year: 2023,
            forest_class: 10,
        };
        let windows = seasonal_windows(&window);
        assert_eq!(windows[0].0, NaiveDate::from_ymd_opt(2022, 2, 28).unwrap());
    }

    #[test]
    fn test_rate_forest_grid_masks_non_forest() {
        let landcover = array![[10u16, 40], [10, 10]];
        let current = array![[0.9, 0.9], [0.1, f64::NAN]];
        let baseline: Vec<Array2<f64>> = (0..5)
            .map(|i| Array2::from_elem((2, 2), 0.5 + 0.05 * i as f64))
            .collect();

        let ratings = rate_forest_grid(&landcover, &current, &baseline, 10).unwrap();
        assert_eq!(ratings[[0, 0]], 5);
        assert_eq!(ratings[[0, 1]], UNRATED);
        assert_eq!(ratings[[1, 0]], 1);
        assert_eq!(ratings[[1, 1]], UNRATED);

        let hist = rating_histogram(&ratings);
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.count(Rating::Excellent), 1);
        assert_eq!(hist.count(Rating::VeryPoor), 1);
    }

    #[test]
    fn test_rate_forest_grid_shape_mismatch() {
        let landcover = Array2::from_elem((2, 2), 10u16);
        let current = Array2::from_elem((2, 3), 0.5);
        assert!(rate_forest_grid(&landcover, &current, &[], 10).is_err());
    }
}
