//! Land-cover diversity calculator
//!
//! Turns a class → pixel-count histogram into:
//! - **Diversity indices**: Shannon, Simpson, evenness over classes
//! - **Habitat fractions**: natural vs anthropogenic share of the AOI
//! - **Top classes**: the largest classes with label, share and area

mod metrics;

pub use metrics::{
    compute_landcover_metrics, habitat_fractions, top_classes, LandCoverMetrics,
    LandCoverParams,
};
