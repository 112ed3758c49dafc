//! # EcoMetrics Core
//!
//! Core types and service boundaries for the EcoMetrics ecological metrics engine.
//!
//! This crate provides:
//! - `ClassHistogram` / `RatingHistogram`: pixel-count histograms from the raster service
//! - `Legend`: the closed land-cover legend and its habitat partition
//! - `OccurrenceSample`: species occurrence records gathered by paging
//! - `Aoi`: validated area of interest
//! - `RasterCompute` / `OccurrenceSource`: narrow traits around remote services
//! - `EngineConfig`: caller-overridable policies

pub mod aoi;
pub mod config;
pub mod error;
pub mod histogram;
pub mod legend;
pub mod metrics;
pub mod occurrence;
pub mod raster_service;

pub use aoi::Aoi;
pub use config::{AreaPolicy, BaselineWindow, EngineConfig, ResolutionPolicy, SamplingPolicy};
pub use error::{Error, ErrorKind, Result};
pub use histogram::{ClassHistogram, Rating, RatingHistogram, ServiceHistogram};
pub use legend::{HabitatKind, Legend, LegendEntry, WorldCoverClass};
pub use metrics::{DiversityIndices, HabitatFractions, TopClass, TopClasses};
pub use occurrence::{
    DateRange, OccurrencePage, OccurrenceQuery, OccurrenceRecord, OccurrenceSample,
    OccurrenceSource,
};
pub use raster_service::{HistogramRequest, RasterCompute};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aoi::Aoi;
    pub use crate::config::EngineConfig;
    pub use crate::error::{Error, Result};
    pub use crate::histogram::{ClassHistogram, Rating, RatingHistogram};
    pub use crate::legend::Legend;
    pub use crate::metrics::DiversityIndices;
    pub use crate::occurrence::{OccurrenceSample, OccurrenceSource};
    pub use crate::raster_service::RasterCompute;
}
