//! GBIF client against a local mock server.

use chrono::NaiveDate;
use ecometrics_cloud::{CloudError, GbifClient, GbifClientOptions};
use ecometrics_core::{DateRange, OccurrenceQuery};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query() -> OccurrenceQuery {
    OccurrenceQuery {
        geometry_wkt: "POLYGON((-3.8 40.3,-3.6 40.3,-3.6 40.5,-3.8 40.3))".into(),
        date_range: DateRange::trailing_year(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()),
    }
}

fn client(server: &MockServer) -> GbifClient {
    GbifClient::new(GbifClientOptions {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn fetch_page_sends_filters_and_maps_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/occurrence/search"))
        .and(query_param("geometry", "POLYGON((-3.8 40.3,-3.6 40.3,-3.6 40.5,-3.8 40.3))"))
        .and(query_param("eventDate", "2024-09-01,2025-09-01"))
        .and(query_param("hasCoordinate", "true"))
        .and(query_param("offset", "300"))
        .and(query_param("limit", "300"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 300, "limit": 300, "endOfRecords": true, "count": 302,
            "results": [
                {"key": 11, "species": "Pica pica", "decimalLatitude": 40.4, "decimalLongitude": -3.7},
                {"key": 12}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server).fetch_page(&query(), 300, 300).await.unwrap();
    assert_eq!(page.count, Some(302));
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[0].species(), Some("Pica pica"));
    assert_eq!(page.records[1].species(), None);
}

#[tokio::test]
async fn count_uses_zero_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/occurrence/search"))
        .and(query_param("limit", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 0, "limit": 0, "endOfRecords": false, "count": 48213, "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client(&server).count(&query()).await.unwrap(), 48213);
}

#[tokio::test]
async fn rate_limit_is_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client(&server).fetch_page(&query(), 0, 300).await.unwrap_err();
    assert!(matches!(err, CloudError::RateLimited));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn server_error_and_bad_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("offset", "300"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let c = client(&server);
    let err = c.fetch_page(&query(), 0, 300).await.unwrap_err();
    assert!(
        matches!(err, CloudError::Status { status: 503, ref body } if body == "maintenance")
    );

    let err = c.fetch_page(&query(), 300, 300).await.unwrap_err();
    assert!(matches!(err, CloudError::Parse(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn missing_count_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let err = client(&server).count(&query()).await.unwrap_err();
    assert!(matches!(err, CloudError::Parse(_)));
}
