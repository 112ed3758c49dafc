//! Species biodiversity from occurrence records
//!
//! - **Query**: buffered and simplified AOI as WKT, trailing-year dates
//! - **Sampling**: sequential paging up to a record cap
//! - **Indices**: richness, Shannon, Simpson, evenness, Berger-Parker

mod indices;
mod query;
mod sampling;

pub use indices::{compute_biodiversity, species_counts, BiodiversityReport};
pub use query::build_query;
pub use sampling::{
    sample_occurrences, sample_with_query, OccurrencePager, OccurrenceSampler, PagingState,
};
