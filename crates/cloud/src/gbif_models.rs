//! GBIF occurrence search data types.
//!
//! Serde models for `GET /occurrence/search`, covering the subset the
//! engine needs: geometry and date filters, offset paging, the total
//! count, and the species name of each record.

use ecometrics_core::{OccurrenceQuery, OccurrenceRecord};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Search request
// ---------------------------------------------------------------------------

/// Query string for `GET /occurrence/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GbifSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,

    /// `start,end` date range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,

    pub has_coordinate: bool,

    pub limit: usize,

    pub offset: usize,
}

impl GbifSearchParams {
    /// Empty search: coordinates required, first page of 20.
    pub fn new() -> Self {
        Self {
            geometry: None,
            event_date: None,
            has_coordinate: true,
            limit: 20,
            offset: 0,
        }
    }

    /// Geometry and date filters of an engine query.
    pub fn from_query(query: &OccurrenceQuery) -> Self {
        Self::new()
            .geometry(&query.geometry_wkt)
            .event_date(&query.date_range.to_param())
    }

    /// Set the WKT search polygon.
    pub fn geometry(mut self, wkt: &str) -> Self {
        self.geometry = Some(wkt.to_string());
        self
    }

    /// Set the event date range (e.g. `"2024-09-01,2025-09-01"`).
    pub fn event_date(mut self, range: &str) -> Self {
        self.event_date = Some(range.to_string());
        self
    }

    /// Set page offset and size.
    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// Count-only request: no records, just the total.
    pub fn count_only(self) -> Self {
        self.page(0, 0)
    }
}

impl Default for GbifSearchParams {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One page of occurrence search results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GbifSearchResponse {
    /// Total records matching the filters.
    #[serde(default)]
    pub count: Option<u64>,

    #[serde(default)]
    pub results: Vec<GbifOccurrence>,
}

/// A single occurrence. GBIF returns many more fields; they are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GbifOccurrence {
    #[serde(default)]
    pub key: Option<u64>,

    /// Species-rank name, absent for records identified above species level.
    #[serde(default)]
    pub species: Option<String>,

    #[serde(default)]
    pub event_date: Option<String>,

    #[serde(default)]
    pub decimal_latitude: Option<f64>,

    #[serde(default)]
    pub decimal_longitude: Option<f64>,
}

impl GbifOccurrence {
    pub fn into_record(self) -> OccurrenceRecord {
        OccurrenceRecord {
            key: self.key,
            species: self.species,
            event_date: self.event_date,
            latitude: self.decimal_latitude,
            longitude: self.decimal_longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ecometrics_core::DateRange;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "offset": 0, "limit": 2, "endOfRecords": false, "count": 1234,
            "results": [
                {"key": 1, "species": "Parus major", "scientificName": "Parus major Linnaeus, 1758",
                 "eventDate": "2025-05-01T08:00:00", "decimalLatitude": 40.41, "decimalLongitude": -3.70,
                 "basisOfRecord": "HUMAN_OBSERVATION"},
                {"key": 2, "genus": "Quercus"}
            ]
        }"#;
        let resp: GbifSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.count, Some(1234));
        assert_eq!(resp.results.len(), 2);

        let records: Vec<OccurrenceRecord> =
            resp.results.into_iter().map(GbifOccurrence::into_record).collect();
        assert_eq!(records[0].species(), Some("Parus major"));
        assert_eq!(records[0].latitude, Some(40.41));
        assert_eq!(records[1].species(), None);
    }

    #[test]
    fn test_params_from_query() {
        let query = OccurrenceQuery {
            geometry_wkt: "POLYGON((0 0,1 0,1 1,0 0))".into(),
            date_range: DateRange::trailing_year(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()),
        };
        let params = GbifSearchParams::from_query(&query).page(300, 300);
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["eventDate"], "2024-09-01,2025-09-01");
        assert_eq!(json["hasCoordinate"], true);
        assert_eq!(json["offset"], 300);

        let count = GbifSearchParams::from_query(&query).count_only();
        assert_eq!(count.limit, 0);
    }
}
