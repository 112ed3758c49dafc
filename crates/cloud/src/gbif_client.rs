//! Async client for the GBIF occurrence search API.
//!
//! One HTTP round trip per call and no retries: paging and retry policy
//! belong to the caller.

use std::time::Duration;

use ecometrics_core::{OccurrencePage, OccurrenceQuery};
use tracing::debug;

use crate::error::{CloudError, Result};
use crate::gbif_models::{GbifOccurrence, GbifSearchParams, GbifSearchResponse};

/// Public GBIF API root.
pub const GBIF_API_URL: &str = "https://api.gbif.org/v1";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for [`GbifClient`].
#[derive(Debug, Clone)]
pub struct GbifClientOptions {
    /// API root, without the `/occurrence/search` suffix.
    pub base_url: String,
    /// Per-request timeout (default 30 s).
    pub request_timeout: Duration,
}

impl Default for GbifClientOptions {
    fn default() -> Self {
        Self {
            base_url: GBIF_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl GbifClientOptions {
    /// Full URL of the occurrence search endpoint.
    pub fn search_url(&self) -> String {
        format!("{}/occurrence/search", self.base_url.trim_end_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Async client for occurrence search.
pub struct GbifClient {
    client: reqwest::Client,
    options: GbifClientOptions,
}

impl GbifClient {
    /// Create a new GBIF client.
    pub fn new(options: GbifClientOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| CloudError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, options })
    }

    pub fn options(&self) -> &GbifClientOptions {
        &self.options
    }

    /// Execute a single search request.
    pub async fn search(&self, params: &GbifSearchParams) -> Result<GbifSearchResponse> {
        let url = self.options.search_url();
        debug!("GET {} offset={} limit={}", url, params.offset, params.limit);

        let resp = self.client.get(&url).query(params).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CloudError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CloudError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| CloudError::Network(format!("reading response body: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| CloudError::Parse(format!("GBIF search response: {e}")))
    }

    /// One page of records for an engine query.
    pub async fn fetch_page(
        &self,
        query: &OccurrenceQuery,
        offset: usize,
        limit: usize,
    ) -> Result<OccurrencePage> {
        let params = GbifSearchParams::from_query(query).page(offset, limit);
        let resp = self.search(&params).await?;
        Ok(OccurrencePage {
            count: resp.count,
            records: resp
                .results
                .into_iter()
                .map(GbifOccurrence::into_record)
                .collect(),
        })
    }

    /// Total records matching an engine query.
    pub async fn count(&self, query: &OccurrenceQuery) -> Result<u64> {
        let params = GbifSearchParams::from_query(query).count_only();
        let resp = self.search(&params).await?;
        resp.count
            .ok_or_else(|| CloudError::Parse("count missing from GBIF response".into()))
    }
}
