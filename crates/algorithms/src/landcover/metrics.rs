//! Land-cover diversity metrics from a class histogram

use ecometrics_core::raster_service::WORLDCOVER_SCALE_M;
use ecometrics_core::{
    ClassHistogram, DiversityIndices, Error, HabitatFractions, HabitatKind, Legend, Result,
    TopClass, TopClasses,
};
use serde::Serialize;

use crate::diversity::diversity_indices;

/// Parameters for land-cover metrics
#[derive(Debug, Clone)]
pub struct LandCoverParams {
    /// Legend used for labels and the habitat partition
    pub legend: Legend,
    /// Number of classes in the ranked table (default: 5)
    pub top_n: usize,
    /// Pixel size the histogram was sampled at, in meters (default: 10)
    pub scale_m: f64,
}

impl Default for LandCoverParams {
    fn default() -> Self {
        Self {
            legend: Legend::worldcover(),
            top_n: 5,
            scale_m: WORLDCOVER_SCALE_M,
        }
    }
}

/// Everything the dashboard shows for land cover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandCoverMetrics {
    pub indices: DiversityIndices,
    pub habitat: HabitatFractions,
    pub top_classes: TopClasses,
}

/// Compute diversity indices, habitat fractions and the top-N class table.
///
/// The histogram must contain at least one pixel; an empty AOI has no
/// defined land-cover diversity.
///
/// # Errors
/// * `InvalidParameter` for an empty histogram
/// * `UnknownLandCoverClass` if a ranked class is missing from the legend
pub fn compute_landcover_metrics(
    histogram: &ClassHistogram,
    params: &LandCoverParams,
) -> Result<LandCoverMetrics> {
    if histogram.total() == 0 {
        return Err(Error::InvalidParameter {
            name: "histogram",
            value: format!("{} bins", histogram.len()),
            reason: "no pixels to compute land-cover metrics from".into(),
        });
    }

    Ok(LandCoverMetrics {
        indices: diversity_indices(&histogram.counts()),
        habitat: habitat_fractions(histogram, &params.legend),
        top_classes: top_classes(histogram, params)?,
    })
}

/// Natural and anthropogenic share of all pixels.
///
/// Classes outside both sets only add to the denominator. An empty
/// histogram gives 0 for both.
pub fn habitat_fractions(histogram: &ClassHistogram, legend: &Legend) -> HabitatFractions {
    let total = histogram.total();
    if total == 0 {
        return HabitatFractions::default();
    }

    let mut natural = 0u64;
    let mut anthropogenic = 0u64;
    for (code, count) in histogram.iter() {
        match legend.habitat(code) {
            Some(HabitatKind::Natural) => natural += count,
            Some(HabitatKind::Anthropogenic) => anthropogenic += count,
            None => {}
        }
    }

    let total_f = total as f64;
    HabitatFractions {
        natural: natural as f64 / total_f,
        anthropogenic: anthropogenic as f64 / total_f,
    }
}

/// Classes ranked by pixel count, largest first, truncated to `params.top_n`.
///
/// Ties keep histogram order.
pub fn top_classes(histogram: &ClassHistogram, params: &LandCoverParams) -> Result<TopClasses> {
    let total = histogram.total();
    let mut bins: Vec<(u16, u64)> = histogram.iter().collect();
    // stable: equal counts stay in histogram order
    bins.sort_by(|a, b| b.1.cmp(&a.1));

    let pixel_ha = params.scale_m * params.scale_m / 10_000.0;

    bins.into_iter()
        .take(params.top_n)
        .map(|(code, pixels)| -> Result<TopClass> {
            let label = params.legend.label(code)?;
            let percent = if total > 0 {
                pixels as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            Ok(TopClass {
                code,
                label: label.to_string(),
                pixels,
                percent,
                area_ha: pixels as f64 * pixel_ha,
            })
        })
        .collect()
}
