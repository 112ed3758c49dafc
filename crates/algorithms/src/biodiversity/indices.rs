//! Species diversity of an occurrence sample

use std::collections::BTreeMap;

use ecometrics_core::{DiversityIndices, OccurrenceSample};
use serde::Serialize;

use crate::diversity::{berger_parker, diversity_indices};

/// Species diversity with the sample sizes it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiodiversityReport {
    /// Records in the sample, including those without a species.
    pub raw_sample_size: usize,
    /// Records that carry a species name (N).
    pub species_bearing_records: u64,
    pub indices: DiversityIndices,
}

/// Observation count per species, ignoring records without one.
pub fn species_counts(sample: &OccurrenceSample) -> BTreeMap<&str, u64> {
    let mut counts = BTreeMap::new();
    for species in sample.records().iter().filter_map(|r| r.species()) {
        *counts.entry(species).or_insert(0u64) += 1;
    }
    counts
}

/// Richness, Shannon, Simpson, evenness and Berger-Parker for a sample.
///
/// A sample with no species-bearing records is a valid outcome (no
/// detections) and yields all-zero indices.
pub fn compute_biodiversity(sample: &OccurrenceSample) -> BiodiversityReport {
    let counts: Vec<u64> = species_counts(sample).into_values().collect();
    let n: u64 = counts.iter().sum();

    let indices = if n == 0 {
        DiversityIndices::zero()
    } else {
        DiversityIndices {
            berger_parker: Some(berger_parker(&counts)),
            ..diversity_indices(&counts)
        }
    };

    BiodiversityReport {
        raw_sample_size: sample.len(),
        species_bearing_records: n,
        indices,
    }
}
