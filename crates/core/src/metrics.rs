//! Metric records handed to the presentation layer

use serde::{Deserialize, Serialize};

/// Scalar diversity indices.
///
/// `berger_parker` is only reported for occurrence samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiversityIndices {
    /// Number of distinct classes or species present.
    pub richness: usize,
    /// `-Σ p·ln(p)`
    pub shannon: f64,
    /// `1 - Σ p²`
    pub simpson: f64,
    /// Shannon / ln(richness), or 0 when richness ≤ 1.
    pub evenness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub berger_parker: Option<f64>,
}

impl DiversityIndices {
    /// All-zero record for samples with no observations.
    pub fn zero() -> Self {
        Self {
            berger_parker: Some(0.0),
            ..Self::default()
        }
    }
}

/// Share of pixels in natural and anthropogenic habitat classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitatFractions {
    pub natural: f64,
    pub anthropogenic: f64,
}

/// One row of the ranked land-cover table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopClass {
    pub code: u16,
    pub label: String,
    pub pixels: u64,
    /// Share of the AOI's pixels, 0..=100.
    pub percent: f64,
    /// Area covered at the histogram's sampling scale.
    pub area_ha: f64,
}

/// Land-cover classes ranked by pixel count, largest first.
pub type TopClasses = Vec<TopClass>;
