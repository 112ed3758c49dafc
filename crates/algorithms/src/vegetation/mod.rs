//! Vegetation anomaly rating pipeline
//!
//! - **Rating rule**: current NDVI vs. seasonal-baseline percentiles, forest pixels only
//! - **Summary**: area and share of forest per rating, degraded vs good
//! - **Resolution**: reduction pixel size chosen from AOI area

mod rating;
mod resolution;
mod summary;

pub use rating::{
    median, ndvi, percentile, rate, rate_forest_grid, rating_histogram, seasonal_windows,
    RatingThresholds, BASELINE_PERCENTILES, UNRATED,
};
pub use resolution::pixel_scale_for;
pub use summary::{summarize_ratings, RatingSummary};
