//! Pixel-count histograms returned by the raster compute service
//!
//! The service reports a frequency histogram as a mapping from the pixel
//! value (as a string) to a pixel count. [`ClassHistogram`] keeps the
//! service's key order so that ties in ranked output are stable;
//! [`RatingHistogram`] is fixed to the five ordinal ratings.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Raw frequency histogram as delivered by the service, in key order.
pub type ServiceHistogram = Vec<(String, f64)>;

// ---------------------------------------------------------------------------
// Class histogram
// ---------------------------------------------------------------------------

/// Land-cover class code → pixel count.
///
/// Unknown codes are preserved; only labeling rejects them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassHistogram {
    bins: Vec<(u16, u64)>,
}

impl ClassHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(code, count)` pairs. Repeated codes are summed into the
    /// position of their first occurrence.
    pub fn from_counts<I: IntoIterator<Item = (u16, u64)>>(counts: I) -> Self {
        let mut hist = Self::new();
        for (code, count) in counts {
            hist.add(code, count);
        }
        hist
    }

    /// Parse a service histogram with keys such as `"10"` or `"10.0"`.
    pub fn from_service_response(response: &[(String, f64)]) -> Result<Self> {
        let mut hist = Self::new();
        for (key, value) in response {
            let code = parse_code(key)?;
            let count = parse_count(key, *value)?;
            hist.add(code, count);
        }
        Ok(hist)
    }

    pub fn add(&mut self, code: u16, count: u64) {
        match self.bins.iter_mut().find(|(c, _)| *c == code) {
            Some((_, n)) => *n += count,
            None => self.bins.push((code, count)),
        }
    }

    /// Count for `code`, zero when absent.
    pub fn get(&self, code: u16) -> u64 {
        self.bins
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Total sampled pixel count.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|(_, n)| n).sum()
    }

    /// Number of classes with a non-zero count.
    pub fn present_classes(&self) -> usize {
        self.bins.iter().filter(|(_, n)| *n > 0).count()
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bins in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.bins.iter().copied()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|(_, n)| *n).collect()
    }
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// Ordinal vegetation-health rating of a pixel against its historical baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    VeryPoor = 1,
    Poor = 2,
    Moderate = 3,
    Good = 4,
    Excellent = 5,
}

impl Rating {
    pub const ALL: [Rating; 5] = [
        Rating::VeryPoor,
        Rating::Poor,
        Rating::Moderate,
        Rating::Good,
        Rating::Excellent,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Rating::VeryPoor),
            2 => Some(Rating::Poor),
            3 => Some(Rating::Moderate),
            4 => Some(Rating::Good),
            5 => Some(Rating::Excellent),
            _ => None,
        }
    }

    /// Ratings 1 and 2 count as degraded.
    pub fn is_degraded(self) -> bool {
        self <= Rating::Poor
    }

    fn index(self) -> usize {
        self as usize - 1
    }
}

/// Rating → pixel count over exactly the five ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingHistogram {
    counts: [u64; 5],
}

impl RatingHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts<I: IntoIterator<Item = (Rating, u64)>>(counts: I) -> Self {
        let mut hist = Self::new();
        for (rating, count) in counts {
            hist.add(rating, count);
        }
        hist
    }

    /// Parse a service histogram. Missing ratings are zero; keys outside
    /// 1..=5 are rejected.
    pub fn from_service_response(response: &[(String, f64)]) -> Result<Self> {
        let mut hist = Self::new();
        for (key, value) in response {
            let code = parse_code(key)?;
            let rating = u8::try_from(code)
                .ok()
                .and_then(Rating::from_value)
                .ok_or_else(|| {
                    Error::MalformedResponse(format!("rating key '{key}' outside 1..=5"))
                })?;
            hist.add(rating, parse_count(key, *value)?);
        }
        Ok(hist)
    }

    pub fn add(&mut self, rating: Rating, count: u64) {
        self.counts[rating.index()] += count;
    }

    pub fn count(&self, rating: Rating) -> u64 {
        self.counts[rating.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Pixels rated 1 or 2.
    pub fn degraded(&self) -> u64 {
        Rating::ALL
            .iter()
            .filter(|r| r.is_degraded())
            .map(|r| self.count(*r))
            .sum()
    }

    /// Pixels rated 3, 4 or 5.
    pub fn good(&self) -> u64 {
        self.total() - self.degraded()
    }

    /// Counts in rating order 1..=5.
    pub fn counts(&self) -> [u64; 5] {
        self.counts
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_code(key: &str) -> Result<u16> {
    let key = key.trim();
    if let Ok(code) = key.parse::<u16>() {
        return Ok(code);
    }
    match key.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v >= 0.0 && v <= u16::MAX as f64 => Ok(v as u16),
        _ => Err(Error::MalformedResponse(format!(
            "histogram key '{key}' is not a class code"
        ))),
    }
}

fn parse_count(key: &str, value: f64) -> Result<u64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::MalformedResponse(format!(
            "histogram count for '{key}' is {value}"
        )));
    }
    Ok(value.round() as u64)
}
