//! Engine configuration
//!
//! Every tunable lives in a plain struct with a `Default` matching the
//! operational values. [`EngineConfig`] bundles them and loads from TOML;
//! keys missing from the file keep their defaults.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::legend::Legend;

// ---------------------------------------------------------------------------
// AOI area governance
// ---------------------------------------------------------------------------

/// Ceiling on AOI area and the shape of the substitute used above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaPolicy {
    /// Maximum permitted AOI area in km².
    pub max_km2: f64,
    /// Substitute square side, in units of `√max_km2` km.
    pub side_factor: f64,
}

impl AreaPolicy {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_km2.is_finite() && self.max_km2 > 0.0) {
            return Err(Error::invalid_parameter("max_km2", self.max_km2, "must be > 0"));
        }
        if !(self.side_factor.is_finite() && self.side_factor > 0.0) {
            return Err(Error::invalid_parameter(
                "side_factor",
                self.side_factor,
                "must be > 0",
            ));
        }
        Ok(())
    }

    /// Side length of the substitute square in km.
    pub fn substitute_side_km(&self) -> f64 {
        self.side_factor * self.max_km2.sqrt()
    }
}

impl Default for AreaPolicy {
    fn default() -> Self {
        Self {
            max_km2: 500.0,
            side_factor: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Rating resolution
// ---------------------------------------------------------------------------

/// AOIs larger than `above_km2` are reduced at `scale_m`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionStep {
    pub above_km2: f64,
    pub scale_m: f64,
}

/// Step function from AOI area to rating-reduction resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionPolicy {
    pub steps: Vec<ResolutionStep>,
    /// Resolution for AOIs below every step.
    pub base_scale_m: f64,
}

impl ResolutionPolicy {
    /// Check that a larger area never maps to a finer resolution.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_scale_m.is_finite() && self.base_scale_m > 0.0) {
            return Err(Error::invalid_parameter(
                "base_scale_m",
                self.base_scale_m,
                "must be > 0",
            ));
        }

        let mut steps = self.steps.clone();
        steps.sort_by(|a, b| a.above_km2.total_cmp(&b.above_km2));

        let mut previous = self.base_scale_m;
        for step in &steps {
            if !step.above_km2.is_finite() || step.above_km2 < 0.0 {
                return Err(Error::invalid_parameter(
                    "above_km2",
                    step.above_km2,
                    "must be a non-negative area",
                ));
            }
            if !step.scale_m.is_finite() || step.scale_m < previous {
                return Err(Error::invalid_parameter(
                    "scale_m",
                    step.scale_m,
                    format!("resolution must not get finer as area grows (previous {previous} m)"),
                ));
            }
            previous = step.scale_m;
        }
        Ok(())
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            steps: vec![
                ResolutionStep {
                    above_km2: 100.0,
                    scale_m: 100.0,
                },
                ResolutionStep {
                    above_km2: 50.0,
                    scale_m: 30.0,
                },
                ResolutionStep {
                    above_km2: 10.0,
                    scale_m: 20.0,
                },
            ],
            base_scale_m: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Occurrence sampling
// ---------------------------------------------------------------------------

/// Occurrence paging and query-shaping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingPolicy {
    /// Records requested per page.
    pub page_size: usize,
    /// Hard cap on the sample, regardless of how many records exist.
    pub max_records: usize,
    /// Outward buffer applied to the AOI before searching.
    pub buffer_m: f64,
    /// Douglas-Peucker tolerance for the buffered search polygon.
    pub simplify_tolerance_m: f64,
}

impl SamplingPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_parameter("page_size", 0, "must be > 0"));
        }
        if !(self.buffer_m.is_finite() && self.buffer_m >= 0.0) {
            return Err(Error::invalid_parameter("buffer_m", self.buffer_m, "must be >= 0"));
        }
        if !(self.simplify_tolerance_m.is_finite() && self.simplify_tolerance_m >= 0.0) {
            return Err(Error::invalid_parameter(
                "simplify_tolerance_m",
                self.simplify_tolerance_m,
                "must be >= 0",
            ));
        }
        Ok(())
    }

    /// Number of records to request given how many are available.
    pub fn sample_size(&self, available: u64) -> usize {
        usize::try_from(available)
            .unwrap_or(usize::MAX)
            .min(self.max_records)
    }
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            page_size: 300,
            max_records: 10_000,
            buffer_m: 10_000.0,
            simplify_tolerance_m: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Vegetation baseline
// ---------------------------------------------------------------------------

/// Current NDVI composite window and the years of its seasonal baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineWindow {
    pub current_start: NaiveDate,
    pub current_end: NaiveDate,
    pub history_start_year: i32,
    pub history_end_year: i32,
    /// Land-cover class whose pixels are rated.
    pub forest_class: u16,
}

impl BaselineWindow {
    /// Window of `months` calendar months ending at `end`.
    pub fn ending_at(end: NaiveDate, months: u32) -> Result<Self> {
        let start = end
            .checked_sub_months(chrono::Months::new(months))
            .ok_or_else(|| Error::invalid_parameter("months", months, "window underflows"))?;
        let window = Self {
            current_start: start,
            current_end: end,
            history_start_year: 2018,
            history_end_year: start.year() - 1,
            ..Self::default()
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<()> {
        if self.current_start > self.current_end {
            return Err(Error::invalid_parameter(
                "current_start",
                self.current_start,
                "window starts after it ends",
            ));
        }
        if self.history_start_year > self.history_end_year {
            return Err(Error::invalid_parameter(
                "history_start_year",
                self.history_start_year,
                "baseline has no years",
            ));
        }
        if self.history_end_year >= self.current_start.year() {
            return Err(Error::invalid_parameter(
                "history_end_year",
                self.history_end_year,
                "baseline must precede the current window",
            ));
        }
        Ok(())
    }
}

impl Default for BaselineWindow {
    fn default() -> Self {
        Self {
            current_start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
            current_end: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap_or_default(),
            history_start_year: 2018,
            history_end_year: 2024,
            forest_class: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// All engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub area: AreaPolicy,
    pub resolution: ResolutionPolicy,
    pub sampling: SamplingPolicy,
    pub baseline: BaselineWindow,
    pub legend: Legend,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.area.validate()?;
        self.resolution.validate()?;
        self.sampling.validate()?;
        self.baseline.validate()?;
        self.legend.validate()
    }
}
