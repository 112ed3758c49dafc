//! Diversity indices
//!
//! Abundance-based indices shared by the land-cover and species calculators:
//! - **Shannon**: information entropy of the category proportions
//! - **Simpson**: probability that two draws differ in category
//! - **Evenness**: Shannon normalized by its maximum for the observed richness
//! - **Berger-Parker**: dominance of the most abundant category

mod indices;

pub use indices::{
    berger_parker, diversity_indices, evenness, richness, shannon, simpson,
};
