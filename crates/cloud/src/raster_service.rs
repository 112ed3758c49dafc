//! Raster compute service responses.
//!
//! A frequency-histogram reduction comes back keyed by band name:
//!
//! ```json
//! {"Map": {"10": 7012, "40": 2988.5}}
//! ```
//!
//! The band value is `null` when the AOI holds no unmasked pixels (for the
//! rating band: no forest). [`RecordedRasterService`] replays saved
//! responses through the [`RasterCompute`] boundary.

use std::collections::HashMap;

use ecometrics_core::{HistogramRequest, RasterCompute, ServiceHistogram};
use serde_json::Value;
use tracing::debug;

use crate::error::{into_core, CloudError, Result};

/// Parse a histogram response for `band`.
///
/// Accepts the band-keyed form above or a bare `{"value": count}` object.
pub fn parse_histogram_json(json: &str, band: &str) -> Result<ServiceHistogram> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| CloudError::Parse(format!("histogram JSON: {e}")))?;

    let Value::Object(top) = value else {
        return Err(CloudError::Parse("histogram must be a JSON object".into()));
    };

    let bins = match top.get(band) {
        Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(bins)) => bins,
        Some(other) => {
            return Err(CloudError::Parse(format!(
                "band {band} holds {other} instead of a histogram"
            )))
        }
        None => &top,
    };

    bins.iter()
        .map(|(key, count)| match count.as_f64() {
            Some(c) => Ok((key.clone(), c)),
            None => Err(CloudError::Parse(format!(
                "count for {key:?} is not a number: {count}"
            ))),
        })
        .collect()
}

/// Raster service that answers from recorded responses, one per band.
#[derive(Debug, Clone, Default)]
pub struct RecordedRasterService {
    by_band: HashMap<String, ServiceHistogram>,
}

impl RecordedRasterService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the histogram served for `band`.
    pub fn insert(&mut self, band: &str, histogram: ServiceHistogram) {
        self.by_band.insert(band.to_string(), histogram);
    }

    /// Parse and record a JSON response for `band`.
    pub fn insert_json(&mut self, band: &str, json: &str) -> Result<()> {
        let histogram = parse_histogram_json(json, band)?;
        self.insert(band, histogram);
        Ok(())
    }
}

impl RasterCompute for RecordedRasterService {
    fn frequency_histogram(
        &self,
        request: &HistogramRequest,
    ) -> ecometrics_core::Result<ServiceHistogram> {
        debug!(
            "histogram {}/{} at {} m (tile scale {:?})",
            request.dataset, request.band, request.scale_m, request.tile_scale
        );
        self.by_band.get(&request.band).cloned().ok_or_else(|| {
            into_core(
                "raster",
                CloudError::Network(format!("no recorded response for band {}", request.band)),
            )
        })
    }
}
