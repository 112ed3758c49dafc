//! # EcoMetrics Cloud
//!
//! Clients for the remote services behind the engine.
//!
//! - **GBIF**: async occurrence search with offset paging, plus a blocking
//!   wrapper that implements [`ecometrics_core::OccurrenceSource`]
//! - **Raster service**: histogram response parsing and a replaying
//!   [`ecometrics_core::RasterCompute`] implementation
//!
//! ## Features
//!
//! - `native` (default): Blocking API via tokio `block_on`

pub mod error;
pub mod gbif_client;
pub mod gbif_models;
pub mod raster_service;

pub mod sync_api;

pub use error::{CloudError, Result};
pub use gbif_client::{GbifClient, GbifClientOptions, GBIF_API_URL};
pub use gbif_models::{GbifOccurrence, GbifSearchParams, GbifSearchResponse};
pub use raster_service::{parse_histogram_json, RecordedRasterService};

/// Blocking API re-exported as `blocking` module (native only).
#[cfg(feature = "native")]
pub mod blocking {
    pub use crate::sync_api::*;
}
