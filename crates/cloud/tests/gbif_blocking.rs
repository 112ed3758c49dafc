//! Blocking GBIF client driving the engine's occurrence sampler.
//!
//! The mock server is started from a throwaway runtime; the blocking
//! client then runs its own runtime on the test thread.

#![cfg(feature = "native")]

use chrono::NaiveDate;
use ecometrics_cloud::blocking::GbifClientBlocking;
use ecometrics_cloud::GbifClientOptions;
use ecometrics_core::{DateRange, ErrorKind, OccurrenceQuery, OccurrenceSource};
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query() -> OccurrenceQuery {
    OccurrenceQuery {
        geometry_wkt: "POLYGON((0 0,1 0,1 1,0 0))".into(),
        date_range: DateRange::trailing_year(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()),
    }
}

fn start_server(rt: &tokio::runtime::Runtime, status: u16, body: serde_json::Value) -> MockServer {
    rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("hasCoordinate", "true"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    })
}

#[test]
fn blocking_client_implements_occurrence_source() {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let server = start_server(
        &rt,
        200,
        json!({"count": 2, "endOfRecords": true, "results": [{"species": "A"}, {"species": "B"}]}),
    );

    let client = GbifClientBlocking::new(GbifClientOptions {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap();

    let page = client.fetch_page(&query(), 0, 300).unwrap();
    assert_eq!(page.records.len(), 2);
    assert_eq!(client.count(&query()).unwrap(), 2);
}

#[test]
fn blocking_errors_are_remote_faults() {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let server = start_server(&rt, 429, json!({}));

    let client = GbifClientBlocking::new(GbifClientOptions {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap();

    let err = client.fetch_page(&query(), 0, 300).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteService);
    assert!(err.to_string().contains("GBIF"));
}
