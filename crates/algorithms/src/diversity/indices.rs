//! Abundance-based diversity indices
//!
//! All functions take raw counts per category (land-cover class or species).
//! Zero counts are ignored. An all-zero input yields 0 for every index.

use ecometrics_core::DiversityIndices;

/// Number of categories with a non-zero count.
pub fn richness(counts: &[u64]) -> usize {
    counts.iter().filter(|&&c| c > 0).count()
}

/// Shannon Diversity Index (H')
///
/// `H' = -sum(pi * ln(pi))` where pi is the proportion of category i.
///
/// Measures information entropy — higher values indicate more diverse
/// communities. H' = 0 when only one category is present.
pub fn shannon(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let total_f = total as f64;
    let mut h = 0.0;
    for &count in counts {
        if count > 0 {
            let pi = count as f64 / total_f;
            h -= pi * pi.ln();
        }
    }
    h
}

/// Simpson Diversity Index (1 - D)
///
/// `D = sum(pi^2)`, result = `1 - D`
///
/// Probability that two randomly drawn individuals belong to different
/// categories. Range [0, 1): 0 = single category.
pub fn simpson(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let total_f = total as f64;
    let d: f64 = counts
        .iter()
        .map(|&c| {
            let pi = c as f64 / total_f;
            pi * pi
        })
        .sum();
    1.0 - d
}

/// Pielou evenness: `H' / ln(S)`.
///
/// Returns 0 when `richness <= 1`, where ln(S) would be 0 or undefined.
pub fn evenness(shannon: f64, richness: usize) -> f64 {
    if richness > 1 {
        shannon / (richness as f64).ln()
    } else {
        0.0
    }
}

/// Berger-Parker dominance: share of the most abundant category.
pub fn berger_parker(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    match counts.iter().max() {
        Some(&max) if total > 0 => max as f64 / total as f64,
        _ => 0.0,
    }
}

/// Richness, Shannon, Simpson and evenness for one set of counts.
pub fn diversity_indices(counts: &[u64]) -> DiversityIndices {
    let s = richness(counts);
    let h = shannon(counts);
    DiversityIndices {
        richness: s,
        shannon: h,
        simpson: simpson(counts),
        evenness: evenness(h, s),
        berger_parker: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_uniform() {
        // 4 equally abundant: H = ln(4)
        let h = shannon(&[25, 25, 25, 25]);
        assert!((h - 4f64.ln()).abs() < 1e-10);
    }

    #[test]
    fn test_single_category_is_zero() {
        let idx = diversity_indices(&[100, 0, 0]);
        assert_eq!(idx.richness, 1);
        assert!(idx.shannon.abs() < 1e-12);
        assert!(idx.simpson.abs() < 1e-12);
        assert_eq!(idx.evenness, 0.0);
    }

    #[test]
    fn test_equal_counts_evenness_one() {
        for k in 2..=11usize {
            let counts = vec![37u64; k];
            let idx = diversity_indices(&counts);
            assert!((idx.shannon - (k as f64).ln()).abs() < 1e-10);
            assert!((idx.evenness - 1.0).abs() < 1e-10, "k={k}: {}", idx.evenness);
        }
    }

    #[test]
    fn test_simpson_two_classes() {
        // 1 - (0.49 + 0.09)
        assert!((simpson(&[700, 300]) - 0.42).abs() < 1e-12);
    }

    #[test]
    fn test_empty_counts() {
        assert_eq!(shannon(&[]), 0.0);
        assert_eq!(simpson(&[0, 0]), 0.0);
        assert_eq!(berger_parker(&[]), 0.0);
        assert_eq!(richness(&[]), 0);
    }

    #[test]
    fn test_berger_parker() {
        assert!((berger_parker(&[2, 1]) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(berger_parker(&[5]), 1.0);
    }
}
