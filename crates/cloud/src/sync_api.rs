//! Blocking (synchronous) API for native platforms.
//!
//! Wraps the async [`GbifClient`](crate::gbif_client::GbifClient) with a
//! Tokio runtime so the engine can use it as an [`OccurrenceSource`].

#[cfg(feature = "native")]
mod inner {
    use ecometrics_core::{OccurrencePage, OccurrenceQuery, OccurrenceSource};

    use crate::error::{into_core, CloudError, Result};
    use crate::gbif_client::{GbifClient, GbifClientOptions};

    /// Blocking wrapper around [`GbifClient`].
    ///
    /// Uses an internal single-threaded Tokio runtime. Must not be called
    /// from inside another async runtime.
    pub struct GbifClientBlocking {
        rt: tokio::runtime::Runtime,
        inner: GbifClient,
    }

    impl GbifClientBlocking {
        /// Create a new blocking GBIF client.
        pub fn new(options: GbifClientOptions) -> Result<Self> {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| CloudError::Network(e.to_string()))?;

            let inner = GbifClient::new(options)?;
            Ok(Self { rt, inner })
        }
    }

    impl OccurrenceSource for GbifClientBlocking {
        fn fetch_page(
            &self,
            query: &OccurrenceQuery,
            offset: usize,
            limit: usize,
        ) -> ecometrics_core::Result<OccurrencePage> {
            self.rt
                .block_on(self.inner.fetch_page(query, offset, limit))
                .map_err(|e| into_core("GBIF", e))
        }

        fn count(&self, query: &OccurrenceQuery) -> ecometrics_core::Result<u64> {
            self.rt
                .block_on(self.inner.count(query))
                .map_err(|e| into_core("GBIF", e))
        }
    }
}

#[cfg(feature = "native")]
pub use inner::*;
