//! Species occurrence records and the occurrence data source boundary

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One species observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    /// Data-source record key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<u64>,
    /// Species name; records without one do not enter diversity indices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl OccurrenceRecord {
    pub fn with_species(species: impl Into<String>) -> Self {
        Self {
            species: Some(species.into()),
            ..Self::default()
        }
    }

    /// Species name, ignoring blank values.
    pub fn species(&self) -> Option<&str> {
        self.species
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Records accumulated by paging, in the data source's native order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccurrenceSample {
    records: Vec<OccurrenceRecord>,
}

impl OccurrenceSample {
    pub fn new(records: Vec<OccurrenceRecord>) -> Self {
        Self { records }
    }

    /// Raw sample size, including records without a species.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[OccurrenceRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<OccurrenceRecord> {
        self.records
    }
}

impl FromIterator<OccurrenceRecord> for OccurrenceSample {
    fn from_iter<I: IntoIterator<Item = OccurrenceRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The 365 days ending at `today`.
    pub fn trailing_year(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(365),
            end: today,
        }
    }

    /// `start,end` in ISO-8601, as occurrence search APIs expect.
    pub fn to_param(&self) -> String {
        format!("{},{}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

/// Spatial and temporal filter shared by paged and count-only requests.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceQuery {
    /// Search polygon in well-known text.
    pub geometry_wkt: String,
    pub date_range: DateRange,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccurrencePage {
    pub records: Vec<OccurrenceRecord>,
    /// Total matches reported by the source, when known.
    pub count: Option<u64>,
}

/// Paged occurrence search API.
///
/// Implementations perform one blocking round trip per call and never
/// retry; callers own timeout and retry policy.
pub trait OccurrenceSource {
    /// Fetch up to `limit` records starting at `offset`.
    fn fetch_page(&self, query: &OccurrenceQuery, offset: usize, limit: usize)
        -> Result<OccurrencePage>;

    /// Total number of records matching `query`.
    fn count(&self, query: &OccurrenceQuery) -> Result<u64>;
}

impl<S: OccurrenceSource + ?Sized> OccurrenceSource for &S {
    fn fetch_page(
        &self,
        query: &OccurrenceQuery,
        offset: usize,
        limit: usize,
    ) -> Result<OccurrencePage> {
        (**self).fetch_page(query, offset, limit)
    }

    fn count(&self, query: &OccurrenceQuery) -> Result<u64> {
        (**self).count(query)
    }
}
