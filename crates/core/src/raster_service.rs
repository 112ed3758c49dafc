//! Raster compute service boundary
//!
//! The engine never reads rasters itself. It asks a managed compute service
//! for frequency histograms of a raster band clipped to the AOI and turns the
//! answers into [`ClassHistogram`] / [`RatingHistogram`].

use crate::aoi::Aoi;
use crate::error::Result;
use crate::histogram::{ClassHistogram, RatingHistogram, ServiceHistogram};

/// ESA WorldCover 2021 classification.
pub const WORLDCOVER_DATASET: &str = "ESA/WorldCover/v200/2021";
pub const WORLDCOVER_BAND: &str = "Map";
/// Native WorldCover resolution.
pub const WORLDCOVER_SCALE_M: f64 = 10.0;

/// Per-pixel NDVI rating raster derived by the service.
pub const NDVI_RATING_DATASET: &str = "ndvi_rating";
pub const NDVI_RATING_BAND: &str = "NDVI_rating";

/// Default pixel budget for a single reduction.
pub const DEFAULT_MAX_PIXELS: f64 = 1e13;

/// Frequency-histogram reduction request.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramRequest {
    pub aoi: Aoi,
    pub dataset: String,
    pub band: String,
    /// Spatial resolution in meters.
    pub scale_m: f64,
    pub max_pixels: f64,
    /// Optional parallelism hint.
    pub tile_scale: Option<u32>,
}

impl HistogramRequest {
    /// WorldCover class histogram at native resolution.
    pub fn landcover(aoi: Aoi) -> Self {
        Self {
            aoi,
            dataset: WORLDCOVER_DATASET.to_string(),
            band: WORLDCOVER_BAND.to_string(),
            scale_m: WORLDCOVER_SCALE_M,
            max_pixels: DEFAULT_MAX_PIXELS,
            tile_scale: None,
        }
    }

    /// Forest NDVI rating histogram at `scale_m`.
    pub fn ndvi_rating(aoi: Aoi, scale_m: f64) -> Self {
        Self {
            aoi,
            dataset: NDVI_RATING_DATASET.to_string(),
            band: NDVI_RATING_BAND.to_string(),
            scale_m,
            max_pixels: DEFAULT_MAX_PIXELS,
            tile_scale: Some(4),
        }
    }
}

/// Managed raster compute service.
pub trait RasterCompute {
    /// Reduce `request.band` over the AOI to a value → pixel-count histogram.
    fn frequency_histogram(&self, request: &HistogramRequest) -> Result<ServiceHistogram>;
}

impl<S: RasterCompute + ?Sized> RasterCompute for &S {
    fn frequency_histogram(&self, request: &HistogramRequest) -> Result<ServiceHistogram> {
        (**self).frequency_histogram(request)
    }
}

/// Fetch the land-cover class histogram for `aoi`.
pub fn fetch_class_histogram<S: RasterCompute + ?Sized>(
    service: &S,
    aoi: &Aoi,
) -> Result<ClassHistogram> {
    let response = service.frequency_histogram(&HistogramRequest::landcover(aoi.clone()))?;
    ClassHistogram::from_service_response(&response)
}

/// Fetch the forest rating histogram for `aoi` at `scale_m`.
pub fn fetch_rating_histogram<S: RasterCompute + ?Sized>(
    service: &S,
    aoi: &Aoi,
    scale_m: f64,
) -> Result<RatingHistogram> {
    let response =
        service.frequency_histogram(&HistogramRequest::ndvi_rating(aoi.clone(), scale_m))?;
    RatingHistogram::from_service_response(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Rating;
    use geo_types::{LineString, Polygon};

    struct Fixed;

    impl RasterCompute for Fixed {
        fn frequency_histogram(&self, request: &HistogramRequest) -> Result<ServiceHistogram> {
            if request.band == WORLDCOVER_BAND {
                Ok(vec![("10".into(), 700.0), ("40".into(), 300.0)])
            } else {
                assert_eq!(request.tile_scale, Some(4));
                Ok(vec![("2".into(), 4.0)])
            }
        }
    }

    fn aoi() -> Aoi {
        Aoi::new(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        ))
        .unwrap()
    }

    #[test]
    fn test_fetch_histograms() {
        let classes = fetch_class_histogram(&Fixed, &aoi()).unwrap();
        assert_eq!(classes.total(), 1000);
        let ratings = fetch_rating_histogram(&Fixed, &aoi(), 20.0).unwrap();
        assert_eq!(ratings.count(Rating::Poor), 4);
        assert_eq!(ratings.total(), 4);
    }
}
