//! # EcoMetrics Algorithms
//!
//! Pure computations behind the EcoMetrics dashboard.
//!
//! ## Modules
//!
//! - **diversity**: Shannon, Simpson, evenness, Berger-Parker over raw counts
//! - **landcover**: Diversity, habitat fractions and top classes of a class histogram
//! - **vegetation**: NDVI percentile rating rule and rating-histogram summaries
//! - **biodiversity**: Occurrence query, paging and species diversity
//! - **aoi**: Area ceiling with bounded substitute
//! - **vector**: Geodesic area, buffer, simplify and WKT for lon/lat polygons

pub(crate) mod maybe_rayon;

pub mod aoi;
pub mod biodiversity;
pub mod diversity;
pub mod landcover;
pub mod vector;
pub mod vegetation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aoi::{enforce_area_limit, GovernedAoi};
    pub use crate::biodiversity::{
        compute_biodiversity, sample_occurrences, BiodiversityReport, OccurrenceSampler,
    };
    pub use crate::diversity::diversity_indices;
    pub use crate::landcover::{compute_landcover_metrics, LandCoverMetrics, LandCoverParams};
    pub use crate::vegetation::{pixel_scale_for, summarize_ratings, RatingSummary};
    pub use ecometrics_core::prelude::*;
}
